// ==========================================
// 食品成本核算系统 - 成本核算引擎
// ==========================================
// 职责: 配方成本的纯计算规则
// 红线: 引擎不做任何文件读写, 输入输出均为内存值
// ==========================================
// 口径:
// - 杂项成本 = 原料总成本 × 0.50
// - 人工成本 = 原料总成本 × 0.45
// - 总成本   = 原料总成本 × 1.95
// - 售价     = 总成本 × (1 + 利润率/100)
// - 金额保留 2 位小数, 单克价格保留 4 位小数
// ==========================================

use tracing::instrument;

use crate::domain::costing::{CostingBreakdown, CostingLine};

// ==========================================
// 成本口径常量
// ==========================================

/// 杂项成本比例（相对原料总成本）
pub const MISC_COST_RATIO: f64 = 0.50;

/// 人工成本比例（相对原料总成本）
pub const LABOR_COST_RATIO: f64 = 0.45;

/// 默认利润率（%）, 仅作为 UI/配置的初始值, 引擎本身不做兜底
pub const DEFAULT_MARGIN_PERCENT: f64 = 150.0;

// ==========================================
// 数值口径
// ==========================================

/// 保留 2 位小数（四舍五入, 远离零）
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 保留 4 位小数（四舍五入, 远离零）
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// 单克价格 = price / grams
///
/// 边界: grams <= 0 时返回 0.0（坏数据不产生 Inf/NaN）
pub fn price_per_gram(price: f64, grams: f64) -> f64 {
    if grams <= 0.0 {
        return 0.0;
    }
    round4(price / grams)
}

/// 单次配方成本 = 单克价格 × 用量
pub fn cost_per_recipe(price_per_gram: f64, grams_needed: f64) -> f64 {
    round2(price_per_gram * grams_needed)
}

// ==========================================
// CostingEngine - 成本核算引擎
// ==========================================
pub struct CostingEngine;

impl CostingEngine {
    /// 创建新的成本核算引擎
    pub fn new() -> Self {
        Self
    }

    /// 由原始字段构造一条计算明细行（派生字段统一重算）
    pub fn build_line(&self, name: &str, price: f64, grams: f64, grams_needed: f64) -> CostingLine {
        let ppg = price_per_gram(price, grams);
        CostingLine {
            name: name.to_string(),
            price,
            grams,
            price_per_gram: ppg,
            grams_needed,
            cost_per_recipe: cost_per_recipe(ppg, grams_needed),
        }
    }

    /// 汇总明细行并拆解成本
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub fn cost_recipe(&self, lines: &[CostingLine], margin_percent: f64) -> CostingBreakdown {
        let ingredient_cost: f64 = lines.iter().map(|l| l.cost_per_recipe).sum();
        self.cost_from_ingredient_total(ingredient_cost, margin_percent)
    }

    /// 由原料总成本直接拆解（杂项/人工/总成本/售价/利润）
    pub fn cost_from_ingredient_total(
        &self,
        ingredient_cost: f64,
        margin_percent: f64,
    ) -> CostingBreakdown {
        let misc_cost = ingredient_cost * MISC_COST_RATIO;
        let labor_cost = ingredient_cost * LABOR_COST_RATIO;
        let total_cost = ingredient_cost + misc_cost + labor_cost;
        let selling_price = total_cost * (1.0 + margin_percent / 100.0);
        let profit = selling_price - total_cost;

        CostingBreakdown {
            ingredient_cost: round2(ingredient_cost),
            misc_cost: round2(misc_cost),
            labor_cost: round2(labor_cost),
            total_cost: round2(total_cost),
            margin_percent,
            selling_price: round2(selling_price),
            profit: round2(profit),
        }
    }
}

impl Default for CostingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_per_gram_basic() {
        // 面粉: 2.50 元 / 1000 克
        assert_eq!(price_per_gram(2.50, 1000.0), 0.0025);
    }

    #[test]
    fn test_price_per_gram_zero_and_negative_grams() {
        assert_eq!(price_per_gram(2.50, 0.0), 0.0);
        assert_eq!(price_per_gram(2.50, -10.0), 0.0);
    }

    #[test]
    fn test_cost_per_recipe_rounding() {
        // 0.0025 × 250 = 0.625 → 0.63（远离零）
        assert_eq!(cost_per_recipe(0.0025, 250.0), 0.63);
    }

    #[test]
    fn test_cost_from_ingredient_total_standard_ratios() {
        let engine = CostingEngine::new();
        let b = engine.cost_from_ingredient_total(100.0, 150.0);

        assert_eq!(b.ingredient_cost, 100.0);
        assert_eq!(b.misc_cost, 50.0);
        assert_eq!(b.labor_cost, 45.0);
        assert_eq!(b.total_cost, 195.0);
        assert_eq!(b.selling_price, 487.50);
        assert_eq!(b.profit, 292.50);
        assert_eq!(b.margin_percent, 150.0);
    }

    #[test]
    fn test_cost_recipe_sums_lines() {
        let engine = CostingEngine::new();
        let lines = vec![
            engine.build_line("Flour", 2.50, 1000.0, 250.0), // 0.63
            engine.build_line("Sugar", 3.00, 1000.0, 100.0), // 0.30
        ];

        let b = engine.cost_recipe(&lines, 100.0);

        assert_eq!(b.ingredient_cost, 0.93);
        assert_eq!(b.total_cost, round2(0.93 * 1.95));
        assert_eq!(b.selling_price, round2(b.total_cost * 2.0));
    }

    #[test]
    fn test_cost_recipe_empty_lines() {
        let engine = CostingEngine::new();
        let b = engine.cost_recipe(&[], 150.0);

        assert_eq!(b.ingredient_cost, 0.0);
        assert_eq!(b.total_cost, 0.0);
        assert_eq!(b.selling_price, 0.0);
        assert_eq!(b.profit, 0.0);
    }

    #[test]
    fn test_build_line_recomputes_derived() {
        let engine = CostingEngine::new();
        let line = engine.build_line("Eggs", 4.50, 600.0, 120.0);

        assert_eq!(line.price_per_gram, 0.0075);
        assert_eq!(line.cost_per_recipe, 0.9);
    }

    #[test]
    fn test_default_margin_constant() {
        assert_eq!(DEFAULT_MARGIN_PERCENT, 150.0);
    }
}
