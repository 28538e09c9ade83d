// ==========================================
// 食品成本核算系统 - 核心库
// ==========================================
// 技术栈: Tauri + Rust + CSV 档案
// 系统定位: 原料成本与配方定价桌面工具
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与值对象
pub mod domain;

// 数据仓储层 - CSV 档案访问
pub mod repository;

// 引擎层 - 成本核算口径
pub mod engine;

// 导出层 - 成本报表
pub mod export;

// 配置层 - 应用设置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - Tauri 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{CostingBreakdown, CostingLine, Ingredient, Recipe};

// 引擎
pub use engine::{CostingEngine, DEFAULT_MARGIN_PERCENT};

// 仓储
pub use repository::{IngredientRepository, RecipeRepository};

// API
pub use api::{CalculatorApi, DashboardApi, IngredientApi, RecipeApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "食品成本核算系统";
