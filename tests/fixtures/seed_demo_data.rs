// ==========================================
// 演示数据生成器
// ==========================================
// 用途: 向数据目录写入演示原料档案, 并打印示例配方的成本核算
// 目录: 命令行第一个参数, 缺省走 FOOD_COSTING_DATA_DIR / 用户数据目录
// ==========================================

use std::error::Error;
use std::path::PathBuf;

use food_costing::app::get_default_data_dir;
use food_costing::engine::costing::{CostingEngine, DEFAULT_MARGIN_PERCENT};
use food_costing::repository::IngredientRepository;

// 演示原料: (名称, 价格, 包装克数, 单次用量克数)
const DEMO_INGREDIENTS: &[(&str, f64, f64, f64)] = &[
    ("Flour", 2.50, 1000.0, 250.0),
    ("Sugar", 3.00, 1000.0, 100.0),
    ("Eggs", 4.50, 600.0, 120.0),
    ("Butter", 5.00, 500.0, 125.0),
];

fn main() -> Result<(), Box<dyn Error>> {
    food_costing::logging::init();

    let data_dir = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => get_default_data_dir(),
    };
    std::fs::create_dir_all(&data_dir)?;
    println!("数据目录: {}", data_dir.display());

    let repo = IngredientRepository::new(&data_dir)?;

    // 按名称去重, 重复执行不产生重复档案
    for &(name, price, grams, grams_needed) in DEMO_INGREDIENTS {
        if repo.find_by_exact_name(name)?.is_some() {
            println!("- {} 已在档, 跳过", name);
            continue;
        }
        let added = repo.add(name.to_string(), price, grams, grams_needed)?;
        println!(
            "✓ 新增 {} (单克 ${:.4}, 单次成本 ${:.2})",
            added.name, added.price_per_gram, added.cost_per_recipe
        );
    }

    // 示例配方核算: 全部演示原料 + 默认毛利率
    let engine = CostingEngine::new();
    let lines: Vec<_> = DEMO_INGREDIENTS
        .iter()
        .map(|&(name, price, grams, grams_needed)| {
            engine.build_line(name, price, grams, grams_needed)
        })
        .collect();
    let breakdown = engine.cost_recipe(&lines, DEFAULT_MARGIN_PERCENT);

    println!();
    println!("示例配方: Chocolate Cake ({}% 毛利率)", DEFAULT_MARGIN_PERCENT);
    println!("  原料成本: ${:.2}", breakdown.ingredient_cost);
    println!("  杂项成本: ${:.2}", breakdown.misc_cost);
    println!("  人工成本: ${:.2}", breakdown.labor_cost);
    println!("  总成本:   ${:.2}", breakdown.total_cost);
    println!("  建议售价: ${:.2}", breakdown.selling_price);
    println!("  利润:     ${:.2}", breakdown.profit);

    println!();
    println!("✓ 演示数据生成完成！");
    Ok(())
}
