// ==========================================
// 食品成本核算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供 Tauri 命令调用
// 说明: 查询软失败（降级空结果）, 变更向上抛错
// ==========================================

pub mod error;
pub mod calculator_api;
pub mod dashboard_api;
pub mod ingredient_api;
pub mod recipe_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use calculator_api::{AdHocLine, CalculatorApi, CostingOutcome};
pub use dashboard_api::{DashboardApi, DashboardSummary};
pub use ingredient_api::IngredientApi;
pub use recipe_api::RecipeApi;
