//! HTTP接口层：路由与共享状态

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::model::snapshot_store::SnapshotStore;

/// 请求体默认上限（字节）
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

mod envelope;
pub mod handlers;
pub mod messages;

pub use envelope::ApiError;

/// 各请求只读共享；无进程内可变状态
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub outline_limit: usize,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(store: SnapshotStore, outline_limit: usize) -> Self {
        Self {
            store: Arc::new(store),
            outline_limit,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/api/save-json", post(handlers::save_json))
        .route("/api/list-json", get(handlers::list_json))
        .route("/api/restore-json", get(handlers::restore_json))
        .route("/api/format-json", post(handlers::format_json))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
