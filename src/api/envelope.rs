use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api::messages::INVALID_FILENAME;
use crate::model::snapshot_store::StoreError;

/// 对外错误：只携带状态码与固定消息
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    PayloadTooLarge(&'static str),
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// 非法输入 → 400，其余（不存在、IO、解析）统一 → 500 + `fallback`
    pub fn from_store(err: &StoreError, fallback: &'static str) -> Self {
        match err {
            StoreError::InvalidInput(_) => ApiError::BadRequest(INVALID_FILENAME),
            StoreError::NotFound(_) | StoreError::Io(_) | StoreError::Parse(_) => {
                ApiError::Internal(fallback)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_store_error_mapping() {
        let invalid = StoreError::InvalidInput("x".into());
        assert_eq!(ApiError::from_store(&invalid, "fb"), ApiError::BadRequest(INVALID_FILENAME));

        let missing = StoreError::NotFound("a.json".into());
        assert_eq!(ApiError::from_store(&missing, "fb"), ApiError::Internal("fb"));

        let io_err = StoreError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(ApiError::from_store(&io_err, "fb").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
