//! 对外错误消息：保持扁平的 `{success:false,error}` 响应体不变
//!
//! 内部错误细节只写日志，不透出给调用方

pub const SAVE_FAILED: &str = "Failed to save JSON";
pub const LIST_FAILED: &str = "Failed to list JSON files";
pub const RESTORE_FAILED: &str = "Failed to restore JSON";
pub const FORMAT_FAILED: &str = "Failed to format JSON";
pub const FILENAME_REQUIRED: &str = "Filename is required";
pub const CONTENT_REQUIRED: &str = "Content is required";
pub const INVALID_FILENAME: &str = "Invalid filename";
pub const INVALID_BODY: &str = "Invalid request body";
pub const BODY_TOO_LARGE: &str = "Request body too large";
