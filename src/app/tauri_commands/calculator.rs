use crate::api::calculator_api::AdHocLine;
use crate::app::state::AppState;
use crate::domain::costing::{CostingBreakdown, CostingLine};

use super::common::{
    emit_frontend_event, map_api_error, map_join_error, to_json, DATA_UPDATED_EVENT,
};

// ==========================================
// 核算相关命令
// ==========================================

/// 核算配方成本（只读, 不落档）
///
/// - ingredient_ids: 勾选的档内原料记录ID
/// - extra_lines: 核算页直接录入的临时用料行
/// - margin_percent: 毛利率原始输入, 空则用设置的默认值
#[tauri::command(rename_all = "snake_case")]
pub async fn calculate_recipe_cost(
    state: tauri::State<'_, AppState>,
    recipe_name: String,
    ingredient_ids: Vec<String>,
    extra_lines: Vec<AdHocLine>,
    margin_percent: String,
) -> Result<String, String> {
    let calculator_api = state.calculator_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.calculate_recipe_cost");
        calculator_api.calculate(&recipe_name, &ingredient_ids, &extra_lines, &margin_percent)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&result)
}

/// 核算并保存配方（写配方快照 + 补录未入档的用料）
#[tauri::command(rename_all = "snake_case")]
pub async fn save_recipe_costing(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    recipe_name: String,
    ingredient_ids: Vec<String>,
    extra_lines: Vec<AdHocLine>,
    margin_percent: String,
) -> Result<String, String> {
    let calculator_api = state.calculator_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.save_recipe_costing");
        calculator_api.calculate_and_save(
            &recipe_name,
            &ingredient_ids,
            &extra_lines,
            &margin_percent,
        )
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "recipe", "action": "add" }),
    );

    to_json(&result)
}

/// 导出成本报表
///
/// - target_dir: 前端保存对话框选定的目录
/// - file_name: 文件名覆写, 空则用设置的默认文件名
#[tauri::command(rename_all = "snake_case")]
pub async fn export_costing_report(
    state: tauri::State<'_, AppState>,
    target_dir: String,
    recipe_name: String,
    breakdown: CostingBreakdown,
    lines: Vec<CostingLine>,
    file_name: Option<String>,
) -> Result<String, String> {
    let calculator_api = state.calculator_api.clone();
    let path = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.export_costing_report");
        calculator_api.export_report(&target_dir, &recipe_name, &breakdown, &lines, file_name)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    to_json(&serde_json::json!({ "path": path.display().to_string() }))
}
