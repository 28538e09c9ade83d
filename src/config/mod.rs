// ==========================================
// 食品成本核算系统 - 配置层
// ==========================================
// 职责: 应用设置管理
// 存储: 数据目录下 settings.json
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{ConfigManager, Settings, SETTINGS_FILE_NAME};
