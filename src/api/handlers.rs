//! 请求处理：save / list / restore / format
//!
//! 文件操作放到阻塞线程池执行；失败统一记录日志后转换为扁平错误响应

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection, StringRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use crate::api::messages::*;
use crate::api::{ApiError, AppState};
use crate::model::formatter::{format_text, FormatReport};
use crate::model::snapshot_store::{SnapshotEntry, StoreError};

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    /// 缺失为 `None`，显式 `null` 为 `Some(Value::Null)`
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Value>,
    /// 字符串原样使用；数字/布尔按文本使用，假值（`false`、`0`）视为未提供
    #[serde(default)]
    pub filename: Option<Value>,
}

/// 解析保存请求中的自定义名称；对象与数组不能作为文件名
fn custom_name(raw: Option<Value>) -> Result<Option<String>, ApiError> {
    match raw {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s).filter(|s| !s.is_empty())),
        Some(Value::Bool(true)) => Ok(Some("true".to_string())),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Array(_)) | Some(Value::Object(_)) => Err(ApiError::BadRequest(INVALID_FILENAME)),
    }
}

/// 请求体被拒：超出大小上限 → 413，其余 → 400
fn body_error(status: StatusCode) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(BODY_TOO_LARGE)
    } else {
        ApiError::BadRequest(INVALID_BODY)
    }
}

fn present<'de, D>(d: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(d).map(Some)
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub files: Vec<SnapshotEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RestoreParams {
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub success: bool,
    pub content: Value,
}

async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
}

/// POST /api/save-json
pub async fn save_json(
    State(state): State<AppState>,
    body: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::warn!("保存请求体无效: {}", e);
        body_error(e.status())
    })?;
    let content = request.content.ok_or(ApiError::BadRequest(CONTENT_REQUIRED))?;
    let custom_name = custom_name(request.filename)?;

    let store = state.store.clone();
    match blocking(move || store.save(&content, custom_name.as_deref())).await {
        Ok(filename) => {
            tracing::info!("快照保存成功: {}", filename);
            Ok(Json(SaveResponse {
                success: true,
                filename,
            }))
        }
        Err(e) => {
            tracing::error!("保存JSON失败: {}", e);
            Err(ApiError::from_store(&e, SAVE_FAILED))
        }
    }
}

/// GET /api/list-json
pub async fn list_json(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let store = state.store.clone();
    match blocking(move || store.list_recent()).await {
        Ok(files) => {
            tracing::debug!("列出 {} 个快照", files.len());
            Ok(Json(ListResponse { files }))
        }
        Err(e) => {
            tracing::error!("列出JSON文件失败: {}", e);
            Err(ApiError::from_store(&e, LIST_FAILED))
        }
    }
}

/// GET /api/restore-json?filename=...
pub async fn restore_json(
    State(state): State<AppState>,
    query: Result<Query<RestoreParams>, QueryRejection>,
) -> Result<Json<RestoreResponse>, ApiError> {
    let Query(params) = query.map_err(|e| {
        tracing::warn!("恢复请求参数无效: {}", e);
        ApiError::BadRequest(INVALID_FILENAME)
    })?;
    let filename = params
        .filename
        .filter(|n| !n.is_empty())
        .ok_or(ApiError::BadRequest(FILENAME_REQUIRED))?;

    let store = state.store.clone();
    let name = filename.clone();
    match blocking(move || store.restore(&name)).await {
        Ok(content) => {
            tracing::info!("快照恢复成功: {}", filename);
            Ok(Json(RestoreResponse {
                success: true,
                content,
            }))
        }
        Err(e) => {
            tracing::error!("恢复JSON失败 {}: {}", filename, e);
            Err(ApiError::from_store(&e, RESTORE_FAILED))
        }
    }
}

/// POST /api/format-json，请求体为原始文本
pub async fn format_json(
    State(state): State<AppState>,
    body: Result<String, StringRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = body.map_err(|e| {
        tracing::warn!("格式化请求体无效: {}", e);
        body_error(e.status())
    })?;
    match format_text(&body, state.outline_limit) {
        Ok(FormatReport::Valid {
            formatted,
            line_count,
            outline,
        }) => Ok(Json(json!({
            "valid": true,
            "formatted": formatted,
            "lineCount": line_count,
            "outline": outline.nodes,
            "truncated": outline.truncated,
        }))),
        Ok(FormatReport::Invalid {
            message,
            line,
            column,
        }) => {
            tracing::debug!("JSON校验失败: {}", message);
            Ok(Json(json!({
                "valid": false,
                "error": message,
                "line": line,
                "column": column,
            })))
        }
        Err(e) => {
            tracing::error!("格式化JSON失败: {}", e);
            Err(ApiError::Internal(FORMAT_FAILED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_name_coercion() {
        assert_eq!(custom_name(None), Ok(None));
        assert_eq!(custom_name(Some(json!(null))), Ok(None));
        assert_eq!(custom_name(Some(json!(""))), Ok(None));
        assert_eq!(custom_name(Some(json!(false))), Ok(None));
        assert_eq!(custom_name(Some(json!(0))), Ok(None));
        assert_eq!(custom_name(Some(json!("foo"))), Ok(Some("foo".to_string())));
        assert_eq!(custom_name(Some(json!(5))), Ok(Some("5".to_string())));
        assert_eq!(custom_name(Some(json!(true))), Ok(Some("true".to_string())));
        assert_eq!(
            custom_name(Some(json!({"a": 1}))),
            Err(ApiError::BadRequest(INVALID_FILENAME))
        );
    }

    #[test]
    fn test_body_error_status() {
        assert_eq!(
            body_error(StatusCode::PAYLOAD_TOO_LARGE),
            ApiError::PayloadTooLarge(BODY_TOO_LARGE)
        );
        assert_eq!(body_error(StatusCode::BAD_REQUEST), ApiError::BadRequest(INVALID_BODY));
    }
}
