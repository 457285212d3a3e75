//! 角色轮播状态机（纯函数部分）
//!
//! Typing → Paused → Deleting → 下一个角色，循环往复；不持有定时器，只给出「下一次触发前的延迟」，
//! 由 timeline（虚拟时钟）或 driver（tokio）负责调度。

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::RotatorError;

/// 打字步长：每 100ms 多显示一个字符
pub const DEFAULT_TYPE_STEP: Duration = Duration::from_millis(100);
/// 整词显示后的停顿
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(2000);
/// 删除步长：每 50ms 少显示一个字符
pub const DEFAULT_DELETE_STEP: Duration = Duration::from_millis(50);
/// 任何阶段的最短延迟；为 0 时定时器会在同一时刻无限重排
pub const MIN_STEP: Duration = Duration::from_millis(1);

/// 轮播阶段
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Typing,
    Paused,
    Deleting,
}

/// 边界 tick 的处理方式
///
/// - `Immediate`：把 L 推到整词长度的那一步同时进入 Paused；把 L 删到 0 的那一步同时切到下一个角色。
/// - `Deferred`：表中每一行各占一个 tick，整词后多等一个打字步长才停顿，删空后多等一个删除步长才切换。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoundaryTick {
    #[default]
    Immediate,
    Deferred,
}

impl BoundaryTick {
    /// 从配置字符串解析，未知值回退为 Immediate
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "deferred" => BoundaryTick::Deferred,
            _ => BoundaryTick::Immediate,
        }
    }
}

/// 各阶段延迟与边界策略
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotatorTiming {
    pub type_step: Duration,
    pub pause: Duration,
    pub delete_step: Duration,
    pub boundary: BoundaryTick,
}

impl Default for RotatorTiming {
    fn default() -> Self {
        Self {
            type_step: DEFAULT_TYPE_STEP,
            pause: DEFAULT_PAUSE,
            delete_step: DEFAULT_DELETE_STEP,
            boundary: BoundaryTick::Immediate,
        }
    }
}

impl RotatorTiming {
    /// 处于 phase 时，下一次触发前应等待的时长（不短于 MIN_STEP）
    pub fn delay_for(&self, phase: Phase) -> Duration {
        let delay = match phase {
            Phase::Typing => self.type_step,
            Phase::Paused => self.pause,
            Phase::Deleting => self.delete_step,
        };
        delay.max(MIN_STEP)
    }
}

/// 固定、非空、循环的角色列表；构造后不可变，克隆只增加引用计数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleList {
    roles: Arc<[String]>,
}

impl RoleList {
    pub fn new<I, S>(roles: I) -> Result<Self, RotatorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        if roles.is_empty() {
            return Err(RotatorError::EmptyRoleList);
        }
        Ok(Self {
            roles: roles.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// 构造时已保证非空，恒为 false
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// 按循环下标取角色（越界时取模）
    pub fn get(&self, index: usize) -> &str {
        &self.roles[index % self.roles.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }

    /// 角色的字符数（按 Unicode 标量计，不按字节）
    pub fn char_len(&self, index: usize) -> usize {
        self.get(index).chars().count()
    }
}

/// 轮播瞬时状态：(当前角色下标, 已显示前缀长度 L, 阶段)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct AnimationState {
    pub role_index: usize,
    pub prefix_len: usize,
    pub phase: Phase,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::initial()
    }
}

impl AnimationState {
    /// 挂载时的初始状态：第一个角色、空文本、Typing
    pub const fn initial() -> Self {
        Self {
            role_index: 0,
            prefix_len: 0,
            phase: Phase::Typing,
        }
    }

    /// 当前应显示的文本：当前角色的前 L 个字符
    pub fn display_text<'a>(&self, roles: &'a RoleList) -> &'a str {
        prefix_chars(roles.get(self.role_index), self.prefix_len)
    }
}

/// 取 s 的前 n 个字符，保证落在 UTF-8 字符边界上
fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// 状态转移：给定当前状态，返回一次触发之后的状态
pub fn transition(state: AnimationState, roles: &RoleList, boundary: BoundaryTick) -> AnimationState {
    let role_len = roles.char_len(state.role_index);
    match state.phase {
        Phase::Typing => {
            if state.prefix_len < role_len {
                let prefix_len = state.prefix_len + 1;
                let phase = if boundary == BoundaryTick::Immediate && prefix_len == role_len {
                    Phase::Paused
                } else {
                    Phase::Typing
                };
                AnimationState {
                    prefix_len,
                    phase,
                    ..state
                }
            } else {
                AnimationState {
                    prefix_len: role_len,
                    phase: Phase::Paused,
                    ..state
                }
            }
        }
        // 无条件切到 Deleting，不复查 L 是否已满
        Phase::Paused => AnimationState {
            phase: Phase::Deleting,
            ..state
        },
        Phase::Deleting => {
            let prefix_len = state.prefix_len.min(role_len);
            if prefix_len > 0 {
                let prefix_len = prefix_len - 1;
                if boundary == BoundaryTick::Immediate && prefix_len == 0 {
                    advance(state, roles)
                } else {
                    AnimationState {
                        prefix_len,
                        ..state
                    }
                }
            } else {
                advance(state, roles)
            }
        }
    }
}

fn advance(state: AnimationState, roles: &RoleList) -> AnimationState {
    AnimationState {
        role_index: (state.role_index + 1) % roles.len(),
        prefix_len: 0,
        phase: Phase::Typing,
    }
}

/// 持有角色列表、时序与当前状态的轮播器；本身不涉及时间，只负责「触发一次」
#[derive(Clone, Debug)]
pub struct RoleRotator {
    roles: RoleList,
    timing: RotatorTiming,
    state: AnimationState,
}

impl RoleRotator {
    pub fn new(roles: RoleList, timing: RotatorTiming) -> Self {
        Self {
            roles,
            timing,
            state: AnimationState::initial(),
        }
    }

    pub fn with_default_timing(roles: RoleList) -> Self {
        Self::new(roles, RotatorTiming::default())
    }

    /// 执行一次转移，返回下一次触发前的延迟
    pub fn tick(&mut self) -> Duration {
        self.state = transition(self.state, &self.roles, self.timing.boundary);
        self.next_delay()
    }

    /// 当前阶段对应的等待时长
    pub fn next_delay(&self) -> Duration {
        self.timing.delay_for(self.state.phase)
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn display_text(&self) -> &str {
        self.state.display_text(&self.roles)
    }

    pub fn roles(&self) -> &RoleList {
        &self.roles
    }

    pub fn timing(&self) -> RotatorTiming {
        self.timing
    }

    /// 回到初始状态（重新挂载时使用）
    pub fn reset(&mut self) {
        self.state = AnimationState::initial();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(items: &[&str]) -> RoleList {
        RoleList::new(items.iter().copied()).unwrap()
    }

    #[test]
    fn test_role_list_rejects_empty() {
        let err = RoleList::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, RotatorError::EmptyRoleList));
    }

    #[test]
    fn test_role_list_get_wraps() {
        let list = roles(&["a", "b", "c"]);
        assert_eq!(list.get(3), "a");
        assert_eq!(list.get(4), "b");
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_prefix_chars_respects_utf8() {
        assert_eq!(prefix_chars("全栈开发", 0), "");
        assert_eq!(prefix_chars("全栈开发", 2), "全栈");
        assert_eq!(prefix_chars("全栈开发", 9), "全栈开发");
    }

    #[test]
    fn test_delay_for_each_phase() {
        let timing = RotatorTiming::default();
        assert_eq!(timing.delay_for(Phase::Typing), Duration::from_millis(100));
        assert_eq!(timing.delay_for(Phase::Paused), Duration::from_millis(2000));
        assert_eq!(timing.delay_for(Phase::Deleting), Duration::from_millis(50));
    }

    #[test]
    fn test_zero_delays_clamped_to_min_step() {
        let timing = RotatorTiming {
            type_step: Duration::ZERO,
            pause: Duration::ZERO,
            delete_step: Duration::ZERO,
            ..RotatorTiming::default()
        };
        for phase in [Phase::Typing, Phase::Paused, Phase::Deleting] {
            assert_eq!(timing.delay_for(phase), MIN_STEP);
        }
    }

    #[test]
    fn test_boundary_from_name() {
        assert_eq!(BoundaryTick::from_name("Deferred"), BoundaryTick::Deferred);
        assert_eq!(BoundaryTick::from_name("immediate"), BoundaryTick::Immediate);
        assert_eq!(BoundaryTick::from_name("???"), BoundaryTick::Immediate);
    }

    #[test]
    fn test_immediate_typing_reaches_pause_on_last_char() {
        let list = roles(&["AB"]);
        let s1 = transition(AnimationState::initial(), &list, BoundaryTick::Immediate);
        assert_eq!((s1.prefix_len, s1.phase), (1, Phase::Typing));
        let s2 = transition(s1, &list, BoundaryTick::Immediate);
        assert_eq!((s2.prefix_len, s2.phase), (2, Phase::Paused));
        let s3 = transition(s2, &list, BoundaryTick::Immediate);
        assert_eq!((s3.prefix_len, s3.phase), (2, Phase::Deleting));
    }

    #[test]
    fn test_immediate_delete_advances_on_last_char() {
        let list = roles(&["A", "B"]);
        let state = AnimationState {
            role_index: 0,
            prefix_len: 1,
            phase: Phase::Deleting,
        };
        let next = transition(state, &list, BoundaryTick::Immediate);
        assert_eq!(
            next,
            AnimationState {
                role_index: 1,
                prefix_len: 0,
                phase: Phase::Typing
            }
        );
    }

    #[test]
    fn test_deferred_takes_extra_boundary_ticks() {
        let list = roles(&["A", "B"]);
        let mut s = AnimationState::initial();
        s = transition(s, &list, BoundaryTick::Deferred);
        assert_eq!((s.prefix_len, s.phase), (1, Phase::Typing));
        s = transition(s, &list, BoundaryTick::Deferred);
        assert_eq!((s.prefix_len, s.phase), (1, Phase::Paused));
        s = transition(s, &list, BoundaryTick::Deferred);
        assert_eq!(s.phase, Phase::Deleting);
        s = transition(s, &list, BoundaryTick::Deferred);
        assert_eq!((s.role_index, s.prefix_len, s.phase), (0, 0, Phase::Deleting));
        s = transition(s, &list, BoundaryTick::Deferred);
        assert_eq!((s.role_index, s.prefix_len, s.phase), (1, 0, Phase::Typing));
    }

    #[test]
    fn test_empty_role_still_cycles() {
        let list = roles(&["", "x"]);
        let mut s = AnimationState::initial();
        s = transition(s, &list, BoundaryTick::Immediate);
        assert_eq!(s.phase, Phase::Paused);
        s = transition(s, &list, BoundaryTick::Immediate);
        assert_eq!(s.phase, Phase::Deleting);
        s = transition(s, &list, BoundaryTick::Immediate);
        assert_eq!((s.role_index, s.phase), (1, Phase::Typing));
    }

    #[test]
    fn test_prefix_invariant_over_many_ticks() {
        let list = roles(&["Full Stack Developer", "", "问题解决者", "Ops"]);
        for boundary in [BoundaryTick::Immediate, BoundaryTick::Deferred] {
            let mut state = AnimationState::initial();
            let mut prev = state;
            for _ in 0..500 {
                state = transition(state, &list, boundary);
                let role = list.get(state.role_index);
                assert!(role.starts_with(state.display_text(&list)));
                assert!(state.prefix_len <= list.char_len(state.role_index));
                if state.role_index == prev.role_index {
                    match prev.phase {
                        Phase::Typing => assert!(state.prefix_len >= prev.prefix_len),
                        Phase::Deleting => assert!(state.prefix_len <= prev.prefix_len),
                        Phase::Paused => assert_eq!(state.prefix_len, prev.prefix_len),
                    }
                }
                prev = state;
            }
        }
    }

    #[test]
    fn test_rotator_tick_returns_next_delay() {
        let mut rotator = RoleRotator::with_default_timing(roles(&["AB"]));
        assert_eq!(rotator.next_delay(), Duration::from_millis(100));
        assert_eq!(rotator.tick(), Duration::from_millis(100));
        assert_eq!(rotator.display_text(), "A");
        assert_eq!(rotator.tick(), Duration::from_millis(2000));
        assert_eq!(rotator.display_text(), "AB");
        assert_eq!(rotator.tick(), Duration::from_millis(50));
        assert_eq!(rotator.state().phase, Phase::Deleting);
        rotator.reset();
        assert_eq!(rotator.state(), AnimationState::initial());
        assert_eq!(rotator.display_text(), "");
    }
}
