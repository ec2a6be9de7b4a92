//! JSON快照服务库
//!
//! 提供JSON文本校验/格式化、结构大纲，以及基于单一目录的快照保存、列出、恢复功能
//! 三个HTTP接口互不依赖，仅通过存储目录与文件名约定耦合

pub mod api;
pub mod config;
pub mod model;
pub mod utils;

// 重新导出主要类型
pub use config::Config;
pub use model::formatter::{format_text, FormatReport};
pub use model::outline::{build_outline, NodeKind, Outline, OutlineNode};
pub use model::snapshot_store::{NamePolicy, SnapshotEntry, SnapshotStore, StoreError};
