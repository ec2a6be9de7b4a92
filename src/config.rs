//! 运行配置：命令行参数，缺省时读取环境变量

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::api::DEFAULT_BODY_LIMIT;
use crate::model::outline::DEFAULT_OUTLINE_LIMIT;
use crate::model::snapshot_store::{NamePolicy, SnapshotStore, DEFAULT_LIST_LIMIT};

#[derive(Parser, Debug, Clone)]
#[command(name = "json_snapshot", version, about = "JSON校验/格式化与快照存取服务")]
pub struct Config {
    /// 监听地址
    #[arg(long, env = "JSON_SNAPSHOT_ADDR", default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,

    /// 快照存储目录
    #[arg(long, env = "JSON_SNAPSHOT_DIR", default_value = "public/saved-json")]
    pub storage_dir: PathBuf,

    /// 列表最多返回的快照数
    #[arg(long, env = "JSON_SNAPSHOT_LIST_LIMIT", default_value_t = DEFAULT_LIST_LIMIT)]
    pub list_limit: usize,

    /// 文件名策略：contained（拒绝越出目录）或 verbatim（原样拼接）
    #[arg(long, env = "JSON_SNAPSHOT_NAME_POLICY", default_value = "contained")]
    pub name_policy: NamePolicy,

    /// 格式化接口返回的大纲节点上限
    #[arg(long, env = "JSON_SNAPSHOT_OUTLINE_LIMIT", default_value_t = DEFAULT_OUTLINE_LIMIT)]
    pub outline_limit: usize,

    /// 请求体大小上限（字节）
    #[arg(long, env = "JSON_SNAPSHOT_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// 启动时创建存储目录
    #[arg(long)]
    pub create_dir: bool,

    /// 日志级别（trace/debug/info/warn/error）
    #[arg(long, env = "JSON_SNAPSHOT_LOG", default_value = "info")]
    pub log_level: tracing::Level,
}

impl Config {
    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(&self.storage_dir)
            .with_policy(self.name_policy)
            .with_list_limit(self.list_limit)
    }
}
