// ==========================================
// 食品成本核算系统 - 成本报表导出
// ==========================================
// 职责: 将一次核算结果写成可读的成本报表 (CSV)
// 说明: 报表只写不读, 与 ingredients/recipes 档案互不影响;
//       未保存的核算结果同样可以导出
// ==========================================

use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::domain::costing::{CostingBreakdown, CostingLine};
use crate::export::error::{ExportError, ExportResult};

/// 默认报表文件名
pub const DEFAULT_REPORT_FILE_NAME: &str = "recipe_costing.csv";

/// 将核算结果写成成本报表
///
/// 布局: 标题 / 配方名 / 成本明细 (Item,Amount) / 用料清单 三段,
/// 金额统一 "$" 前缀两位小数, 段间以空行分隔
pub fn write_costing_report(
    path: &Path,
    recipe_name: &str,
    breakdown: &CostingBreakdown,
    lines: &[CostingLine],
) -> ExportResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ExportError::DirectoryNotFound(
                parent.display().to_string(),
            ));
        }
    }

    // 各段列数不同, 按宽松模式写入
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;

    writer.write_record(["Recipe Costing Report"])?;
    blank_row(&mut writer)?;
    writer.write_record(["Recipe Name", recipe_name])?;
    blank_row(&mut writer)?;

    writer.write_record(["Cost Breakdown"])?;
    writer.write_record(["Item", "Amount"])?;
    writer.write_record(["Ingredient Cost", dollars(breakdown.ingredient_cost).as_str()])?;
    writer.write_record(["Misc Cost (50%)", dollars(breakdown.misc_cost).as_str()])?;
    writer.write_record(["Labor Cost (45%)", dollars(breakdown.labor_cost).as_str()])?;
    writer.write_record(["Total Cost", dollars(breakdown.total_cost).as_str()])?;
    let selling_label = format!(
        "Selling Price ({}% margin)",
        percent(breakdown.margin_percent)
    );
    writer.write_record([
        selling_label.as_str(),
        dollars(breakdown.selling_price).as_str(),
    ])?;
    writer.write_record(["Profit", dollars(breakdown.profit).as_str()])?;
    blank_row(&mut writer)?;

    writer.write_record(["Ingredients Used"])?;
    writer.write_record(["Ingredient", "Grams Needed", "Cost per Recipe"])?;
    for line in lines {
        writer.write_record([
            line.name.as_str(),
            line.grams_needed.to_string().as_str(),
            dollars(line.cost_per_recipe).as_str(),
        ])?;
    }

    writer.flush()?;
    info!(
        path = %path.display(),
        line_count = lines.len(),
        "成本报表已导出"
    );
    Ok(())
}

/// 空行（零字段记录只写行终止符）
fn blank_row<W: std::io::Write>(writer: &mut csv::Writer<W>) -> ExportResult<()> {
    writer.write_record(std::iter::empty::<&str>())?;
    Ok(())
}

/// 金额格式: "$" 前缀两位小数
fn dollars(value: f64) -> String {
    format!("${:.2}", value)
}

/// 百分比格式: 整数值省略小数位
fn percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}
