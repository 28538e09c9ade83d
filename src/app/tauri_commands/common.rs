use crate::api::error::ApiError;
use serde::{Deserialize, Serialize};
use tauri::Manager;

// ==========================================
// 公共工具：错误映射、事件发送
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串（Tauri要求）
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: match &err {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::StorageError(_) => "STORAGE_ERROR",
            ApiError::SerializationError(_) => "SERIALIZATION_ERROR",
            ApiError::ConfigError(_) => "CONFIG_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
        .to_string(),
        message: err.to_string(),
        details: None,
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 将命令返回载荷序列化为JSON字符串; 失败时走统一错误封套
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value)
        .map_err(|e| map_api_error(ApiError::SerializationError(e.to_string())))
}

/// spawn_blocking 任务 Join 失败的统一映射
pub(super) fn map_join_error(err: tauri::Error) -> String {
    map_api_error(ApiError::InternalError(format!("任务执行失败: {}", err)))
}

/// best-effort: emit a frontend event; do not fail the command if emitting fails.
pub(super) fn emit_frontend_event(app: &tauri::AppHandle, event: &str, payload: serde_json::Value) {
    if let Err(e) = app.emit_all(event, payload) {
        tracing::warn!("emit_all failed: event={}, error={}", event, e);
    }
}

/// 档案变更事件名（前端据此刷新列表视图）
pub(super) const DATA_UPDATED_EVENT: &str = "data_updated";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_codes() {
        let cases = [
            (ApiError::InvalidInput("x".to_string()), "INVALID_INPUT"),
            (ApiError::ConfigError("x".to_string()), "CONFIG_ERROR"),
            (
                ApiError::SerializationError("x".to_string()),
                "SERIALIZATION_ERROR",
            ),
            (ApiError::InternalError("x".to_string()), "INTERNAL_ERROR"),
        ];
        for (err, expected_code) in cases {
            let raw = map_api_error(err);
            let envelope: ErrorResponse =
                serde_json::from_str(&raw).expect("Failed to parse envelope");
            assert_eq!(envelope.code, expected_code);
            assert!(!envelope.message.is_empty());
        }
    }

    #[test]
    fn test_to_json_serializes_payload() {
        let json = to_json(&serde_json::json!({ "deleted": true })).expect("Failed to serialize");
        assert_eq!(json, r#"{"deleted":true}"#);
    }
}
