// ==========================================
// 食品成本核算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含 UI 逻辑
// ==========================================

pub mod costing;
pub mod ingredient;
pub mod recipe;

// 重导出核心类型
pub use costing::{CostingBreakdown, CostingLine};
pub use ingredient::Ingredient;
pub use recipe::Recipe;
