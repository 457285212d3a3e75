//! API 健康监测
//!
//! 启动时立即检查一次，之后按固定间隔（默认 30s）轮询；结果以 ApiStatus 经 watch 发布给状态栏。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::client::ContentClient;
use super::error::ContentError;
use super::types::HealthStatus;

pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);

/// 健康检查来源（真实客户端或测试桩）
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<HealthStatus, ContentError>;
}

#[async_trait]
impl HealthProbe for ContentClient {
    async fn check(&self) -> Result<HealthStatus, ContentError> {
        self.health().await
    }
}

/// 状态栏显示的 API 状态
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiStatus {
    /// 首次检查尚未返回
    Connecting,
    Connected { version: String },
    Offline,
}

impl ApiStatus {
    pub fn label(&self) -> String {
        match self {
            ApiStatus::Connecting => "Connecting...".to_string(),
            ApiStatus::Connected { version } => format!("Connected • v{version}"),
            ApiStatus::Offline => "Offline".to_string(),
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ApiStatus::Connected { .. })
    }
}

/// 轮询任务
pub struct HealthMonitor {
    status_rx: watch::Receiver<ApiStatus>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    /// 启动轮询；token 取消后任务退出
    pub fn spawn(probe: Arc<dyn HealthProbe>, interval: Duration, token: CancellationToken) -> Self {
        let (status_tx, status_rx) = watch::channel(ApiStatus::Connecting);
        let task = tokio::spawn(poll_health(probe, interval, status_tx, token));
        Self { status_rx, task }
    }

    pub fn status(&self) -> ApiStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ApiStatus> {
        self.status_rx.clone()
    }

    /// 等待任务结束（调用前应先取消 token）
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "health monitor ended abnormally");
        }
    }
}

async fn poll_health(
    probe: Arc<dyn HealthProbe>,
    interval: Duration,
    status_tx: watch::Sender<ApiStatus>,
    token: CancellationToken,
) {
    // interval 的第一次 tick 立即完成
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let status = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = probe.check() => match result {
                Ok(health) => {
                    tracing::debug!(version = %health.version, database = %health.database, "api healthy");
                    ApiStatus::Connected { version: health.version }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "health check failed");
                    ApiStatus::Offline
                }
            },
        };
        status_tx.send_if_modified(|current| {
            if *current != status {
                tracing::info!(status = %status.label(), "api status changed");
                *current = status;
                true
            } else {
                false
            }
        });
    }
}
