//! Folio - 个人作品集终端版
//!
//! 模块划分：
//! - **rotator**: 打字机式角色轮播（纯状态机 / 虚拟时钟驱动 / tokio 驱动）
//! - **content**: 作品集内容 API 的类型、查询缓存、客户端与健康监测
//! - **contact**: 联系表单校验与提交状态
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **observability**: 日志初始化
//! - **ui**: Ratatui TUI 界面

pub mod config;
pub mod contact;
pub mod content;
pub mod observability;
pub mod rotator;
pub mod ui;

pub use rotator::{MountedRotator, RoleList, RoleRotator, RotatorTiming, VirtualTimeline};
