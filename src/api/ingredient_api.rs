// ==========================================
// 食品成本核算系统 - 原料 API
// ==========================================
// 职责: 原料档案的查询与维护, 前端表单输入的解析校验
// 说明: 查询接口软失败（降级空列表）, 变更接口向上抛错
// ==========================================

use std::sync::Arc;
use tracing::{debug, error};

use crate::api::error::{
    parse_numeric_fields, validate_required_fields, ApiError, ApiResult,
};
use crate::domain::ingredient::Ingredient;
use crate::repository::ingredient_repo::IngredientRepository;

// ==========================================
// IngredientApi - 原料 API
// ==========================================

/// 原料API
///
/// 职责：
/// 1. 原料档案查询（全部 / 模糊检索）
/// 2. 原料新增、更新、删除
/// 3. 表单字符串输入的解析与校验
pub struct IngredientApi {
    ingredient_repo: Arc<IngredientRepository>,
}

impl IngredientApi {
    /// 创建新的IngredientApi实例
    ///
    /// # 参数
    /// - ingredient_repo: 原料档案仓储
    pub fn new(ingredient_repo: Arc<IngredientRepository>) -> Self {
        Self { ingredient_repo }
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 查询全部原料
    ///
    /// 读取失败降级为空列表, 错误仅记录日志
    pub fn list_ingredients(&self) -> Vec<Ingredient> {
        match self.ingredient_repo.list_all() {
            Ok(list) => list,
            Err(e) => {
                error!(error = %e, "原料列表读取失败, 返回空列表");
                Vec::new()
            }
        }
    }

    /// 按名称检索原料（大小写无关子串; 空查询等价于全部）
    pub fn search_ingredients(&self, query: &str) -> Vec<Ingredient> {
        match self.ingredient_repo.search(query) {
            Ok(list) => list,
            Err(e) => {
                error!(query = %query, error = %e, "原料检索失败, 返回空列表");
                Vec::new()
            }
        }
    }

    // ==========================================
    // 变更接口
    // ==========================================

    /// 新增原料
    ///
    /// # 参数
    /// - name / price / grams / grams_needed: 前端表单原始输入
    ///
    /// # 返回
    /// - Ok(Ingredient): 新增的原料（含派生字段）
    /// - Err(ApiError): 校验或存储失败
    pub fn add_ingredient(
        &self,
        name: &str,
        price: &str,
        grams: &str,
        grams_needed: &str,
    ) -> ApiResult<Ingredient> {
        validate_required_fields(
            &[name, price, grams, grams_needed],
            "Please fill in all fields",
        )?;
        let (price, grams, grams_needed) = parse_numeric_fields(price, grams, grams_needed)?;

        let added =
            self.ingredient_repo
                .add(name.trim().to_string(), price, grams, grams_needed)?;
        debug!(record_id = %added.record_id, name = %added.name, "原料已新增");
        Ok(added)
    }

    /// 更新原料（按记录ID, 派生字段重算）
    pub fn update_ingredient(
        &self,
        record_id: &str,
        name: &str,
        price: &str,
        grams: &str,
        grams_needed: &str,
    ) -> ApiResult<Ingredient> {
        if record_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }
        validate_required_fields(
            &[name, price, grams, grams_needed],
            "Please fill in all fields",
        )?;
        let (price, grams, grams_needed) = parse_numeric_fields(price, grams, grams_needed)?;

        let updated = self.ingredient_repo.update(
            record_id,
            name.trim().to_string(),
            price,
            grams,
            grams_needed,
        )?;
        debug!(record_id = %updated.record_id, "原料已更新");
        Ok(updated)
    }

    /// 删除原料（按记录ID）
    pub fn delete_ingredient(&self, record_id: &str) -> ApiResult<()> {
        if record_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("记录ID不能为空".to_string()));
        }

        self.ingredient_repo.delete(record_id)?;
        debug!(record_id = %record_id, "原料已删除");
        Ok(())
    }
}
