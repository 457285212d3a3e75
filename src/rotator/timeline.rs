//! 虚拟时钟驱动
//!
//! 不依赖真实墙钟：`advance` 推进虚拟时间，按到期顺序逐个触发定时器。
//! 任意时刻至多一个挂起定时器，每次触发后立即调度唯一的替代者；`unmount` 后不再有定时器。

use std::time::Duration;

use super::machine::{AnimationState, RoleList, RoleRotator, RotatorTiming};

/// 挂起的定时器：到期的虚拟时间点
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingTimer {
    due: Duration,
}

/// 在虚拟时间线上运行的轮播器（「挂载」即开始计时）
#[derive(Debug)]
pub struct VirtualTimeline {
    rotator: RoleRotator,
    now: Duration,
    pending: Option<PendingTimer>,
    fired: u64,
}

impl VirtualTimeline {
    /// 挂载：状态复位并调度第一个定时器
    pub fn mount(mut rotator: RoleRotator) -> Self {
        rotator.reset();
        let mut timeline = Self {
            rotator,
            now: Duration::ZERO,
            pending: None,
            fired: 0,
        };
        let delay = timeline.rotator.next_delay();
        timeline.schedule(delay);
        timeline
    }

    /// 调度新定时器；旧的（若有）被直接替换，不会重复触发
    fn schedule(&mut self, delay: Duration) {
        self.pending = Some(PendingTimer {
            due: self.now + delay,
        });
    }

    /// 推进虚拟时间，期间到期的定时器按顺序触发；返回本次触发的次数
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.now + by;
        let mut fired = 0;
        while let Some(timer) = self.pending {
            if timer.due > target {
                break;
            }
            self.now = timer.due;
            self.pending = None;
            let delay = self.rotator.tick();
            self.schedule(delay);
            fired += 1;
        }
        self.now = target;
        self.fired += fired as u64;
        fired
    }

    /// 推进到绝对时间点（早于当前时间时不动）
    pub fn advance_to(&mut self, at: Duration) -> usize {
        self.advance(at.saturating_sub(self.now))
    }

    /// 卸载：取消挂起的定时器，之后 advance 不再改变状态
    pub fn unmount(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!(at_ms = self.now.as_millis() as u64, "rotator timeline unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_timers(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    /// 下一个定时器的到期时间
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.map(|t| t.due)
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// 自挂载以来已触发的定时器总数
    pub fn fired(&self) -> u64 {
        self.fired
    }

    pub fn state(&self) -> AnimationState {
        self.rotator.state()
    }

    pub fn display_text(&self) -> &str {
        self.rotator.display_text()
    }

    pub fn rotator(&self) -> &RoleRotator {
        &self.rotator
    }
}

/// 从全新挂载开始经过 elapsed 后的状态；同样的输入永远得到同样的结果
pub fn state_at(roles: &RoleList, timing: RotatorTiming, elapsed: Duration) -> AnimationState {
    let mut timeline = VirtualTimeline::mount(RoleRotator::new(roles.clone(), timing));
    timeline.advance(elapsed);
    timeline.state()
}
