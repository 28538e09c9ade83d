// ==========================================
// 食品成本核算系统 - 原料领域模型
// ==========================================
// 职责: 原料档案实体定义
// 红线: price_per_gram / cost_per_recipe 为派生字段,
//       仅在写入路径统一重算, 外部传入值一律忽略
// ==========================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::costing::{cost_per_recipe, price_per_gram};

// ==========================================
// Ingredient - 原料档案记录
// ==========================================
// 用途: 原料档案 CSV 的行实体
// 说明: 名称允许重复, 定位一律使用 record_id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    // ===== 主键 =====
    pub record_id: String, // 记录ID (UUID)

    // ===== 原始字段 =====
    pub name: String,        // 原料名称
    pub price: f64,          // 采购价格（整包）
    pub grams: f64,          // 整包克重
    pub grams_needed: f64,   // 单次配方用量（克）

    // ===== 派生字段 =====
    pub price_per_gram: f64,  // 单克价格 = price / grams（grams<=0 时为 0, 4位小数）
    pub cost_per_recipe: f64, // 单次配方成本 = price_per_gram × grams_needed（2位小数）

    // ===== 审计字段 =====
    pub created_at: String, // 创建时间
    pub updated_at: String, // 更新时间
}

impl Ingredient {
    /// 创建新的原料记录（自动生成 UUID 和时间戳, 并重算派生字段）
    pub fn new(name: String, price: f64, grams: f64, grams_needed: f64) -> Self {
        let now = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let ppg = price_per_gram(price, grams);
        Self {
            record_id: Uuid::new_v4().to_string(),
            name,
            price,
            grams,
            grams_needed,
            price_per_gram: ppg,
            cost_per_recipe: cost_per_recipe(ppg, grams_needed),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// 用新的原始字段覆盖记录并重算派生字段
    ///
    /// record_id 与 created_at 保持不变, updated_at 刷新为当前时间
    pub fn apply_update(&mut self, name: String, price: f64, grams: f64, grams_needed: f64) {
        self.name = name;
        self.price = price;
        self.grams = grams;
        self.grams_needed = grams_needed;
        self.recompute_derived();
        self.updated_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }

    /// 重算派生字段（档案迁移/补全时也会调用, 保证口径一致）
    pub fn recompute_derived(&mut self) {
        self.price_per_gram = price_per_gram(self.price, self.grams);
        self.cost_per_recipe = cost_per_recipe(self.price_per_gram, self.grams_needed);
    }
}
