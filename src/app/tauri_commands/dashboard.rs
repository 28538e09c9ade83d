use crate::app::state::AppState;

use super::common::{map_join_error, to_json};

// ==========================================
// 仪表盘 / 关于页相关命令
// ==========================================

/// 首页汇总数据（档案计数 + 数据目录）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_dashboard_summary(state: tauri::State<'_, AppState>) -> Result<String, String> {
    let dashboard_api = state.dashboard_api.clone();
    let result = tauri::async_runtime::spawn_blocking(move || {
        let _perf = crate::perf::PerfGuard::new("ipc.get_dashboard_summary");
        dashboard_api.get_summary()
    })
    .await
    .map_err(map_join_error)?;

    to_json(&result)
}

/// 应用信息（关于页）
#[tauri::command(rename_all = "snake_case")]
pub async fn get_app_info() -> Result<String, String> {
    to_json(&serde_json::json!({
        "name": crate::APP_NAME,
        "version": crate::VERSION,
    }))
}
