// ==========================================
// 食品成本核算系统 - 导出层
// ==========================================
// 职责: 面向用户的报表输出
// 支持: CSV 成本报表
// ==========================================

// 模块声明
pub mod costing_report;
pub mod error;

// 重导出核心类型
pub use costing_report::{write_costing_report, DEFAULT_REPORT_FILE_NAME};
pub use error::{ExportError, ExportResult};
