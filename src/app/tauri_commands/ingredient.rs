use crate::app::state::AppState;

use super::common::{
    emit_frontend_event, map_api_error, map_join_error, to_json, DATA_UPDATED_EVENT,
};

// ==========================================
// 原料相关命令
// ==========================================

/// 查询原料列表
#[tauri::command(rename_all = "snake_case")]
pub async fn list_ingredients(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let ingredient_api = state.ingredient_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.list_ingredients");
        ingredient_api.list_ingredients()
    })
    .await
    .map_err(map_join_error)?;

    to_json(&result)
}

/// 按名称检索原料（大小写无关子串; 空查询返回全部）
#[tauri::command(rename_all = "snake_case")]
pub async fn search_ingredients(
    state: tauri::State<'_, AppState>,
    query: String,
) -> Result<String, String> {
    let ingredient_api = state.ingredient_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.search_ingredients");
        ingredient_api.search_ingredients(&query)
    })
    .await
    .map_err(map_join_error)?;

    to_json(&result)
}

/// 新增原料（表单字段为原始字符串, 解析校验在 API 层）
#[tauri::command(rename_all = "snake_case")]
pub async fn add_ingredient(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    name: String,
    price: String,
    grams: String,
    grams_needed: String,
) -> Result<String, String> {
    let ingredient_api = state.ingredient_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.add_ingredient");
        ingredient_api.add_ingredient(&name, &price, &grams, &grams_needed)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "ingredient", "action": "add" }),
    );

    to_json(&result)
}

/// 更新原料（按记录ID, 派生字段重算）
#[tauri::command(rename_all = "snake_case")]
pub async fn update_ingredient(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    record_id: String,
    name: String,
    price: String,
    grams: String,
    grams_needed: String,
) -> Result<String, String> {
    let ingredient_api = state.ingredient_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.update_ingredient");
        ingredient_api.update_ingredient(&record_id, &name, &price, &grams, &grams_needed)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "ingredient", "action": "update" }),
    );

    to_json(&result)
}

/// 删除原料（按记录ID）
#[tauri::command(rename_all = "snake_case")]
pub async fn delete_ingredient(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    record_id: String,
) -> Result<String, String> {
    let ingredient_api = state.ingredient_api.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.delete_ingredient");
        ingredient_api.delete_ingredient(&record_id)
    })
    .await
    .map_err(map_join_error)?
    .map_err(map_api_error)?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "ingredient", "action": "delete" }),
    );

    to_json(&serde_json::json!({ "deleted": true }))
}
