// ==========================================
// 食品成本核算系统 - 成本核算值对象
// ==========================================
// 职责: 成本拆解结果与计算明细行定义
// 说明: 两者均为计算器输出,不单独落盘;
//       CostingBreakdown 在保存配方时作为快照写入配方档案
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// CostingBreakdown - 成本拆解结果
// ==========================================
/// 一次成本核算的完整拆解
///
/// 口径（与配方档案的派生字段一致）:
/// - misc_cost  = ingredient_cost × 0.50
/// - labor_cost = ingredient_cost × 0.45
/// - total_cost = ingredient_cost + misc_cost + labor_cost
/// - selling_price = total_cost × (1 + margin_percent / 100)
/// - profit = selling_price - total_cost
///
/// 所有金额保留 2 位小数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostingBreakdown {
    pub ingredient_cost: f64, // 原料总成本
    pub misc_cost: f64,       // 杂项成本 (50%)
    pub labor_cost: f64,      // 人工成本 (45%)
    pub total_cost: f64,      // 总成本
    pub margin_percent: f64,  // 利润率（%）
    pub selling_price: f64,   // 建议售价
    pub profit: f64,          // 利润
}

// ==========================================
// CostingLine - 计算明细行
// ==========================================
/// 计算器中的单行原料明细（派生字段已重算）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostingLine {
    pub name: String,         // 原料名称
    pub price: f64,           // 采购价格（整包）
    pub grams: f64,           // 整包克重
    pub price_per_gram: f64,  // 单克价格（4位小数）
    pub grams_needed: f64,    // 单次配方用量（克）
    pub cost_per_recipe: f64, // 单次配方成本（2位小数）
}
