// ==========================================
// 食品成本核算系统 - 数据仓储层
// ==========================================
// 职责: 提供 CSV 档案数据访问接口, 屏蔽文件细节
// 红线: Repository 不含成本业务逻辑
// 约束: 整文件重写一律走临时文件+原子改名
// ==========================================

pub mod csv_io;
pub mod error;
pub mod field_map;
pub mod ingredient_repo;
pub mod recipe_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use ingredient_repo::{IngredientRepository, INGREDIENTS_FILE_NAME};
pub use recipe_repo::{RecipeRepository, RECIPES_FILE_NAME};
