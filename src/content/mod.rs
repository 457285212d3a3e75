//! 内容层：作品集 API 的类型、缓存、客户端、健康监测与展示辅助

pub mod cache;
pub mod client;
pub mod error;
pub mod format;
pub mod health;
pub mod types;

pub use cache::{QueryCache, QueryKey, QueryKind};
pub use client::{health_url, normalize_api_base, ClientOptions, ContentClient, FetchPolicy};
pub use error::ContentError;
pub use health::{ApiStatus, HealthMonitor, HealthProbe, DEFAULT_HEALTH_INTERVAL};
pub use types::{
    Certificate, ContactSubmission, ContactSubmitResponse, Experience, HealthStatus,
    LanguageCount, PortfolioStats, ProfileInfo, Project, ProjectFilter, ProjectListResponse, Skill,
    SkillsGrouped,
};
