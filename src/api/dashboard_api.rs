// ==========================================
// 食品成本核算系统 - 仪表盘 API
// ==========================================
// 职责: 首页汇总数据（档案计数 + 数据目录）
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::repository::ingredient_repo::IngredientRepository;
use crate::repository::recipe_repo::RecipeRepository;

// ==========================================
// DashboardSummary - 仪表盘汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// 在档原料数
    pub ingredient_count: usize,
    /// 已保存配方数
    pub recipe_count: usize,
    /// 数据目录（诊断用）
    pub data_dir: String,
}

// ==========================================
// DashboardApi - 仪表盘 API
// ==========================================
pub struct DashboardApi {
    ingredient_repo: Arc<IngredientRepository>,
    recipe_repo: Arc<RecipeRepository>,
    data_dir: PathBuf,
}

impl DashboardApi {
    /// 创建新的DashboardApi实例
    pub fn new(
        ingredient_repo: Arc<IngredientRepository>,
        recipe_repo: Arc<RecipeRepository>,
        data_dir: &Path,
    ) -> Self {
        Self {
            ingredient_repo,
            recipe_repo,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// 汇总面板数据
    ///
    /// 计数读取失败按 0 处理, 错误仅记录日志（查询软失败策略）
    pub fn get_summary(&self) -> DashboardSummary {
        let ingredient_count = match self.ingredient_repo.count() {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "原料计数失败, 按 0 展示");
                0
            }
        };
        let recipe_count = match self.recipe_repo.count() {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "配方计数失败, 按 0 展示");
                0
            }
        };

        DashboardSummary {
            ingredient_count,
            recipe_count,
            data_dir: self.data_dir.display().to_string(),
        }
    }
}
