use crate::api::error::ApiError;
use crate::app::state::AppState;
use crate::config::config_manager::Settings;

use super::common::{emit_frontend_event, map_api_error, to_json, DATA_UPDATED_EVENT};

// ==========================================
// 设置相关命令
// ==========================================

/// 读取应用设置
#[tauri::command(rename_all = "snake_case")]
pub async fn get_settings(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let settings = state
        .config_manager
        .get_settings()
        .map_err(|e| map_api_error(ApiError::ConfigError(format!("设置读取失败: {}", e))))?;

    to_json(&settings)
}

/// 覆写应用设置（默认毛利率 / 报表文件名）
#[tauri::command(rename_all = "snake_case")]
pub async fn update_settings(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
    default_margin_percent: f64,
    export_file_name: String,
) -> Result<String, String> {
    // 与核算页一致: 零毛利合法, 只拒绝负值
    if default_margin_percent < 0.0 {
        return Err(map_api_error(ApiError::InvalidInput(
            "毛利率不能为负".to_string(),
        )));
    }
    let export_file_name = export_file_name.trim().to_string();
    if export_file_name.is_empty() {
        return Err(map_api_error(ApiError::InvalidInput(
            "报表文件名不能为空".to_string(),
        )));
    }

    let saved = state
        .config_manager
        .update_settings(Settings {
            default_margin_percent,
            export_file_name,
        })
        .map_err(|e| map_api_error(ApiError::ConfigError(format!("设置保存失败: {}", e))))?;

    emit_frontend_event(
        &app,
        DATA_UPDATED_EVENT,
        serde_json::json!({ "entity": "settings", "action": "update" }),
    );

    to_json(&saved)
}
