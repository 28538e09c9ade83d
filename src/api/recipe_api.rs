// ==========================================
// 食品成本核算系统 - 配方 API
// ==========================================
// 职责: 已保存配方的查询与删除
// 说明: 配方新增只走核算 API 的 calculate_and_save, 此处不提供
// ==========================================

use std::sync::Arc;
use tracing::{debug, error};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::recipe::Recipe;
use crate::repository::recipe_repo::RecipeRepository;

// ==========================================
// RecipeApi - 配方 API
// ==========================================

/// 配方API
///
/// 职责：
/// 1. 配方档案查询（全部 / 模糊检索 / 按ID）
/// 2. 配方删除
pub struct RecipeApi {
    recipe_repo: Arc<RecipeRepository>,
}

impl RecipeApi {
    /// 创建新的RecipeApi实例
    ///
    /// # 参数
    /// - recipe_repo: 配方档案仓储
    pub fn new(recipe_repo: Arc<RecipeRepository>) -> Self {
        Self { recipe_repo }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询全部配方
    ///
    /// 读取失败降级为空列表, 错误仅记录日志
    pub fn list_recipes(&self) -> Vec<Recipe> {
        match self.recipe_repo.list_all() {
            Ok(list) => list,
            Err(e) => {
                error!(error = %e, "配方列表读取失败, 返回空列表");
                Vec::new()
            }
        }
    }

    /// 按名称检索配方（大小写无关子串; 空查询等价于全部）
    pub fn search_recipes(&self, query: &str) -> Vec<Recipe> {
        match self.recipe_repo.search(query) {
            Ok(list) => list,
            Err(e) => {
                error!(query = %query, error = %e, "配方检索失败, 返回空列表");
                Vec::new()
            }
        }
    }

    /// 按记录ID查询配方
    ///
    /// # 返回
    /// - Ok(Some(Recipe)): 配方快照
    /// - Ok(None): 配方不存在
    pub fn get_recipe(&self, record_id: &str) -> ApiResult<Option<Recipe>> {
        if record_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        Ok(self.recipe_repo.find_by_id(record_id)?)
    }

    // ==========================================
    // 变更接口
    // ==========================================

    /// 删除配方（按记录ID）
    pub fn delete_recipe(&self, record_id: &str) -> ApiResult<()> {
        if record_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }

        self.recipe_repo.delete(record_id)?;
        debug!(record_id = %record_id, "配方已删除");
        Ok(())
    }
}
