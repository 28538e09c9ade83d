// ==========================================
// 食品成本核算系统 - 配方领域模型
// ==========================================
// 职责: 配方档案实体定义
// 说明: 配方入档只有一条路径: 名称 + 完整成本快照(含利润率),
//       不存在缺省利润率的兜底写入
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::costing::CostingBreakdown;

// ==========================================
// Recipe - 配方档案记录
// ==========================================
// 用途: 配方档案 CSV 的行实体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    // ===== 主键 =====
    pub record_id: String, // 记录ID (UUID)

    // ===== 基础信息 =====
    pub name: String, // 配方名称

    // ===== 成本快照（入档时计算结果） =====
    pub ingredient_cost: f64, // 原料总成本
    pub misc_cost: f64,       // 杂项成本 (50%)
    pub labor_cost: f64,      // 人工成本 (45%)
    pub total_cost: f64,      // 总成本
    pub margin_percent: f64,  // 入档时使用的利润率（%）
    pub selling_price: f64,   // 建议售价
    pub profit: f64,          // 利润

    // ===== 用料清单（自由文本） =====
    // 逗号拼接的原料名列表, 仅供展示, 不再反解为结构化引用
    pub ingredients_used: String,

    // ===== 审计字段 =====
    pub created_at: String, // 创建时间
}

impl Recipe {
    /// 由成本快照创建配方记录（自动生成 UUID 和时间戳）
    pub fn new(name: String, costing: &CostingBreakdown, ingredients_used: String) -> Self {
        let now = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        Self {
            record_id: Uuid::new_v4().to_string(),
            name,
            ingredient_cost: costing.ingredient_cost,
            misc_cost: costing.misc_cost,
            labor_cost: costing.labor_cost,
            total_cost: costing.total_cost,
            margin_percent: costing.margin_percent,
            selling_price: costing.selling_price,
            profit: costing.profit,
            ingredients_used,
            created_at: now,
        }
    }

    /// 还原入档时的成本快照
    pub fn costing_snapshot(&self) -> CostingBreakdown {
        CostingBreakdown {
            ingredient_cost: self.ingredient_cost,
            misc_cost: self.misc_cost,
            labor_cost: self.labor_cost,
            total_cost: self.total_cost,
            margin_percent: self.margin_percent,
            selling_price: self.selling_price,
            profit: self.profit,
        }
    }
}
