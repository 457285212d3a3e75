//! tokio 驱动：把 RoleRotator 挂载为后台任务
//!
//! 任务内同一时刻只有一个 `sleep` 在等待；每次到期执行一次 tick，再用新延迟睡下一轮。
//! 卸载（`unmount` 或 Drop）先取消 token，select 偏向取消分支，保证取消后不再修改状态。

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::machine::{AnimationState, Phase, RoleRotator};

/// 渲染层读取的快照
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RotatorSnapshot {
    pub role_index: usize,
    pub display_text: String,
    pub phase: Phase,
}

impl RotatorSnapshot {
    fn capture(rotator: &RoleRotator) -> Self {
        let AnimationState {
            role_index, phase, ..
        } = rotator.state();
        Self {
            role_index,
            display_text: rotator.display_text().to_string(),
            phase,
        }
    }
}

/// 已挂载的轮播器句柄；与视图同生命周期，Drop 即卸载
pub struct MountedRotator {
    snapshot_rx: watch::Receiver<RotatorSnapshot>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl MountedRotator {
    /// 挂载：状态复位并在当前 tokio 运行时上启动驱动任务
    pub fn mount(mut rotator: RoleRotator) -> Self {
        rotator.reset();
        let (snapshot_tx, snapshot_rx) = watch::channel(RotatorSnapshot::capture(&rotator));
        let token = CancellationToken::new();
        let task = tokio::spawn(run_rotator(rotator, snapshot_tx, token.clone()));
        Self {
            snapshot_rx,
            token,
            task: Some(task),
        }
    }

    /// 当前应显示的文本
    pub fn display_text(&self) -> String {
        self.snapshot_rx.borrow().display_text.clone()
    }

    pub fn snapshot(&self) -> RotatorSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// 订阅快照变化（渲染循环可 await changed）
    pub fn subscribe(&self) -> watch::Receiver<RotatorSnapshot> {
        self.snapshot_rx.clone()
    }

    /// 驱动任务是否仍在运行
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// 卸载并等待驱动任务退出
    pub async fn unmount(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "rotator task ended abnormally");
                }
            }
        }
    }
}

impl Drop for MountedRotator {
    fn drop(&mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_rotator(
    mut rotator: RoleRotator,
    snapshot_tx: watch::Sender<RotatorSnapshot>,
    token: CancellationToken,
) {
    tracing::debug!(roles = rotator.roles().len(), "rotator mounted");
    loop {
        let delay = rotator.next_delay();
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
        rotator.tick();
        snapshot_tx.send_replace(RotatorSnapshot::capture(&rotator));
    }
    tracing::debug!(state = ?rotator.state(), "rotator unmounted");
}
