//! Folio - 个人作品集终端版
//!
//! 入口：加载配置、初始化日志、创建内容客户端与健康监测，并运行 TUI 主循环。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use folio::config::load_config;
use folio::content::{ContentClient, HealthMonitor};
use folio::rotator::RoleRotator;
use folio::{observability, ui::run_app};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 第一个参数可指定额外的配置文件
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = load_config(config_path).context("Failed to load config")?;

    // TUI 占用终端，日志写文件；guard 需持有到退出
    let log_dir = cfg.app.log_dir_or_default();
    let _log_guard = match observability::init_file(&log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            observability::init();
            tracing::warn!(dir = %log_dir.display(), error = %e, "log dir unavailable, logging to stderr");
            None
        }
    };
    tracing::info!(version = env!("CARGO_PKG_VERSION"), api = %cfg.api.base_url, "folio starting");

    let roles = cfg.hero.role_list().context("Invalid [hero] roles")?;
    let rotator = RoleRotator::new(roles, cfg.hero.timing());

    let client = Arc::new(
        ContentClient::new(cfg.api.client_options()).context("Failed to create content client")?,
    );

    let shutdown = CancellationToken::new();
    let monitor = HealthMonitor::spawn(client.clone(), cfg.api.health_interval(), shutdown.clone());

    let title = cfg.app.name.clone().unwrap_or_else(|| "Portfolio".to_string());
    let result = run_app(title, rotator, client, monitor.subscribe())
        .await
        .context("App run failed");

    shutdown.cancel();
    monitor.join().await;
    tracing::info!("folio stopped");
    result
}
