//! 程序入口：解析配置、初始化日志、启动HTTP服务

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::fmt::SubscriberBuilder;

use json_snapshot::api::{self, AppState};
use json_snapshot::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let _ = SubscriberBuilder::default()
        .with_max_level(config.log_level)
        .try_init();

    if config.create_dir {
        std::fs::create_dir_all(&config.storage_dir)
            .with_context(|| format!("创建存储目录失败: {}", config.storage_dir.display()))?;
    }

    let store = config.store();
    let app = api::router(AppState::new(store, config.outline_limit).with_body_limit(config.body_limit));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("监听失败: {}", config.addr))?;
    tracing::info!(
        "服务启动成功: http://{}，存储目录: {}，文件名策略: {:?}",
        config.addr,
        config.storage_dir.display(),
        config.name_policy
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP服务异常退出")?;

    tracing::info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("无法监听退出信号: {}", e);
    }
}
