//! 打字机式角色轮播
//!
//! - **machine**: 纯状态机（RoleList、AnimationState、transition、RoleRotator）
//! - **timeline**: 虚拟时钟驱动，单一挂起定时器，供确定性测试与离线推演
//! - **driver**: tokio 驱动，挂载为后台任务并通过 watch 发布快照，卸载/Drop 时取消定时器

pub mod driver;
pub mod machine;
pub mod timeline;

use thiserror::Error;

pub use driver::{MountedRotator, RotatorSnapshot};
pub use machine::{
    transition, AnimationState, BoundaryTick, Phase, RoleList, RoleRotator, RotatorTiming,
};
pub use timeline::{state_at, VirtualTimeline};

/// 轮播器构造错误；运行期状态机本身没有错误态
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotatorError {
    #[error("Role list must contain at least one role")]
    EmptyRoleList,
}
