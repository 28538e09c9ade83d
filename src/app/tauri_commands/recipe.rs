use crate::app::state::AppState;

use super::common::{
    emit_frontend_event, map_api_error, map_join_error, to_json, DATA_UPDATED_EVENT,
};

// ==========================================
// 配方相关命令
// ==========================================

/// 查询配方列表
#[tauri::command(rename_all = "snake_case")]
pub async fn list_recipes(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let recipe_api = state.recipe_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.list_recipes");
        recipe_api.list_recipes()
    })
    .await
    .map_err(map_join_error)?;

    to_json(&result)
}

/// 按名称检索配方
#[tauri::command(rename_all = "snake_case")]
pub async fn search_recipes(
    state: tauri::State<'_, AppState>,
    query: String,
) -> Result<String, String> {
    let recipe_api = state.recipe_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.search_recipes");
        recipe_api.search_recipes(&query)
    })
    .await
    .map_err(map_join_error)?;

    to_json(&result)
}

/// 删除配方（按记录ID; 配方不支持编辑, 只能删除后重算）
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_recipe(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    record_id: String,
) -> Result<String, String> {
    let recipe_api = state.recipe_api.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.delete_recipe");
        recipe_api.delete_recipe(&record_id)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "recipe", "action": "delete" }),
    );

    to_json(&serde_json::json!({ "deleted": true }))
}
