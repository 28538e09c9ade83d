// ==========================================
// 食品成本核算系统 - 核算 API
// ==========================================
// 职责: 配方成本核算、保存与报表导出的编排
// 说明: calculate 对档案只读; calculate_and_save 先落配方,
//       再逐行补录不在档的用料, 补录失败降级为告警
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::error::{
    parse_margin_percent, parse_numeric_fields, validate_required_fields, ApiError, ApiResult,
};
use crate::config::config_manager::ConfigManager;
use crate::domain::costing::{CostingBreakdown, CostingLine};
use crate::engine::costing::{CostingEngine, DEFAULT_MARGIN_PERCENT};
use crate::repository::ingredient_repo::IngredientRepository;
use crate::repository::recipe_repo::RecipeRepository;

// ==========================================
// AdHocLine - 核算页直接录入的用料行
// ==========================================
/// 未入档的用料行, 字段为前端表单原始输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdHocLine {
    pub name: String,
    pub price: String,
    pub grams: String,
    pub grams_needed: String,
}

// ==========================================
// CostingOutcome - 一次核算的完整结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostingOutcome {
    pub recipe_name: String,
    pub breakdown: CostingBreakdown,
    pub lines: Vec<CostingLine>,
    /// 保存核算时写入的配方记录ID; 仅核算不保存时为 None
    pub saved_recipe_id: Option<String>,
}

// ==========================================
// CalculatorApi - 核算 API
// ==========================================

/// 核算API
///
/// 职责：
/// 1. 选中档内原料 + 临时用料行的成本核算
/// 2. 核算结果落配方档案并补录用料
/// 3. 成本报表导出
pub struct CalculatorApi {
    ingredient_repo: Arc<IngredientRepository>,
    recipe_repo: Arc<RecipeRepository>,
    config_manager: Arc<ConfigManager>,
    engine: CostingEngine,
}

impl CalculatorApi {
    /// 创建新的CalculatorApi实例
    ///
    /// # 参数
    /// - ingredient_repo: 原料档案仓储
    /// - recipe_repo: 配方档案仓储
    /// - config_manager: 应用设置（默认毛利率、报表文件名）
    pub fn new(
        ingredient_repo: Arc<IngredientRepository>,
        recipe_repo: Arc<RecipeRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            ingredient_repo,
            recipe_repo,
            config_manager,
            engine: CostingEngine::new(),
        }
    }

    // ==========================================
    // 核算接口
    // ==========================================

    /// 核算配方成本（不落盘）
    ///
    /// # 参数
    /// - recipe_name: 配方名
    /// - ingredient_ids: 选中的档内原料记录ID
    /// - extra_lines: 核算页直接录入的用料行
    /// - margin_percent: 毛利率原始输入, 空则用设置的默认值
    ///
    /// # 返回
    /// - Ok(CostingOutcome): 成本拆解 + 逐行明细
    /// - Err(ApiError): 校验失败或档案读取失败
    pub fn calculate(
        &self,
        recipe_name: &str,
        ingredient_ids: &[String],
        extra_lines: &[AdHocLine],
        margin_percent: &str,
    ) -> ApiResult<CostingOutcome> {
        // 校验顺序与原界面一致: 用料 → 配方名 → 毛利率
        if ingredient_ids.is_empty() && extra_lines.is_empty() {
            return Err(ApiError::InvalidInput(
                "Please select at least one ingredient".to_string(),
            ));
        }
        let recipe_name = recipe_name.trim();
        if recipe_name.is_empty() {
            return Err(ApiError::InvalidInput(
                "Please enter a recipe name".to_string(),
            ));
        }
        let margin = parse_margin_percent(margin_percent, self.default_margin())?;

        let lines = self.resolve_lines(ingredient_ids, extra_lines)?;
        let breakdown = self.engine.cost_recipe(&lines, margin);

        Ok(CostingOutcome {
            recipe_name: recipe_name.to_string(),
            breakdown,
            lines,
            saved_recipe_id: None,
        })
    }

    /// 核算并保存配方
    ///
    /// 先写配方快照, 再逐行按名称精确查档补录用料;
    /// 补录失败只记告警, 不影响配方保存结果
    pub fn calculate_and_save(
        &self,
        recipe_name: &str,
        ingredient_ids: &[String],
        extra_lines: &[AdHocLine],
        margin_percent: &str,
    ) -> ApiResult<CostingOutcome> {
        let mut outcome =
            self.calculate(recipe_name, ingredient_ids, extra_lines, margin_percent)?;

        let ingredients_used = outcome
            .lines
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let saved = self
            .recipe_repo
            .add(outcome.recipe_name.clone(), &outcome.breakdown, ingredients_used)?;

        // 用料补录: 每行重新查档, 与原工具的逐行全量比对口径一致
        for line in &outcome.lines {
            match self.ingredient_repo.find_by_exact_name(&line.name) {
                Ok(Some(_)) => {}
                Ok(None) => {
                    if let Err(e) = self.ingredient_repo.add(
                        line.name.clone(),
                        line.price,
                        line.grams,
                        line.grams_needed,
                    ) {
                        warn!(name = %line.name, error = %e, "配方用料补录失败, 跳过");
                    }
                }
                Err(e) => {
                    warn!(name = %line.name, error = %e, "配方用料查档失败, 跳过补录");
                }
            }
        }

        info!(
            recipe_id = %saved.record_id,
            recipe_name = %outcome.recipe_name,
            total_cost = outcome.breakdown.total_cost,
            "配方已保存"
        );
        outcome.saved_recipe_id = Some(saved.record_id);
        Ok(outcome)
    }

    // ==========================================
    // 报表导出接口
    // ==========================================

    /// 导出成本报表
    ///
    /// # 参数
    /// - target_dir: 导出目录（前端保存对话框选定）
    /// - recipe_name / breakdown / lines: 待导出的核算结果（可未保存）
    /// - file_name: 文件名覆写, 空则用设置的默认文件名
    ///
    /// # 返回
    /// - Ok(PathBuf): 报表完整路径
    pub fn export_report(
        &self,
        target_dir: &str,
        recipe_name: &str,
        breakdown: &CostingBreakdown,
        lines: &[CostingLine],
        file_name: Option<String>,
    ) -> ApiResult<PathBuf> {
        if target_dir.trim().is_empty() {
            return Err(ApiError::InvalidInput("导出目录不能为空".to_string()));
        }

        let file_name = match file_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.default_report_file_name(),
        };

        let path = Path::new(target_dir.trim()).join(file_name);
        crate::export::write_costing_report(&path, recipe_name, breakdown, lines)?;
        Ok(path)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 组装核算行: 档内原料按ID取出重算, 临时行解析校验后重算
    fn resolve_lines(
        &self,
        ingredient_ids: &[String],
        extra_lines: &[AdHocLine],
    ) -> ApiResult<Vec<CostingLine>> {
        let mut lines = Vec::with_capacity(ingredient_ids.len() + extra_lines.len());

        for record_id in ingredient_ids {
            let ingredient = self
                .ingredient_repo
                .find_by_id(record_id)?
                .ok_or_else(|| {
                    ApiError::NotFound(format!("Ingredient(id={})不存在", record_id))
                })?;
            lines.push(self.engine.build_line(
                &ingredient.name,
                ingredient.price,
                ingredient.grams,
                ingredient.grams_needed,
            ));
        }

        for extra in extra_lines {
            validate_required_fields(
                &[&extra.name, &extra.price, &extra.grams, &extra.grams_needed],
                "Please fill in all fields for new ingredient",
            )?;
            let (price, grams, grams_needed) =
                parse_numeric_fields(&extra.price, &extra.grams, &extra.grams_needed)?;
            lines.push(
                self.engine
                    .build_line(extra.name.trim(), price, grams, grams_needed),
            );
        }

        Ok(lines)
    }

    fn default_margin(&self) -> f64 {
        match self.config_manager.get_settings() {
            Ok(settings) => settings.default_margin_percent,
            Err(e) => {
                warn!(error = %e, "设置读取失败, 使用内置默认毛利率");
                DEFAULT_MARGIN_PERCENT
            }
        }
    }

    fn default_report_file_name(&self) -> String {
        match self.config_manager.get_settings() {
            Ok(settings) => settings.export_file_name,
            Err(e) => {
                warn!(error = %e, "设置读取失败, 使用内置默认报表文件名");
                crate::export::DEFAULT_REPORT_FILE_NAME.to_string()
            }
        }
    }
}
