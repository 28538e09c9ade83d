// ==========================================
// 食品成本核算系统 - 引擎层
// ==========================================
// 职责: 实现成本核算业务规则
// 红线: Engine 不做文件读写, 所有口径集中在此层
// ==========================================

pub mod costing;

// 重导出核心引擎
pub use costing::CostingEngine;
pub use costing::{DEFAULT_MARGIN_PERCENT, LABOR_COST_RATIO, MISC_COST_RATIO};
