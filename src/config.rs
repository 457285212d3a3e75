//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FOLIO__*` 覆盖（双下划线表示嵌套，如 `FOLIO__API__BASE_URL=http://127.0.0.1:8000`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::content::{ClientOptions, FetchPolicy};
use crate::rotator::{BoundaryTick, RoleList, RotatorError, RotatorTiming};

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub hero: HeroSection,
    pub api: ApiSection,
}

/// [app] 段：显示名与日志目录
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
    /// TUI 日志目录，未设置时用 ./logs
    pub log_dir: Option<PathBuf>,
}

impl AppSection {
    pub fn log_dir_or_default(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| PathBuf::from("logs"))
    }
}

/// [hero] 段：轮播角色与节奏
#[derive(Debug, Clone, Deserialize)]
pub struct HeroSection {
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    #[serde(default = "default_type_delay_ms")]
    pub type_delay_ms: u64,
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default = "default_delete_delay_ms")]
    pub delete_delay_ms: u64,
    /// immediate / deferred，见 BoundaryTick
    #[serde(default = "default_boundary")]
    pub boundary: String,
}

fn default_roles() -> Vec<String> {
    vec![
        "Full Stack Developer".into(),
        "Frontend Developer".into(),
        "Backend Developer".into(),
        "Python Developer".into(),
        "DevOps Enthusiast".into(),
        "System Design Enthusiast".into(),
        "Problem Solver".into(),
    ]
}

fn default_type_delay_ms() -> u64 {
    100
}

fn default_pause_ms() -> u64 {
    2000
}

fn default_delete_delay_ms() -> u64 {
    50
}

fn default_boundary() -> String {
    "immediate".to_string()
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            roles: default_roles(),
            type_delay_ms: default_type_delay_ms(),
            pause_ms: default_pause_ms(),
            delete_delay_ms: default_delete_delay_ms(),
            boundary: default_boundary(),
        }
    }
}

impl HeroSection {
    /// 各延迟至少 1ms
    pub fn timing(&self) -> RotatorTiming {
        RotatorTiming {
            type_step: Duration::from_millis(self.type_delay_ms.max(1)),
            pause: Duration::from_millis(self.pause_ms.max(1)),
            delete_step: Duration::from_millis(self.delete_delay_ms.max(1)),
            boundary: BoundaryTick::from_name(&self.boundary),
        }
    }

    /// 空列表返回 EmptyRoleList
    pub fn role_list(&self) -> Result<RoleList, RotatorError> {
        RoleList::new(self.roles.iter().cloned())
    }
}

/// [api] 段：后端地址、超时、重试、新鲜期、健康轮询间隔
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// 资料、技能、经历、证书的新鲜期
    #[serde(default = "default_long_stale_secs")]
    pub long_stale_secs: u64,
    /// 项目、统计的新鲜期
    #[serde(default = "default_short_stale_secs")]
    pub short_stale_secs: u64,
    #[serde(default = "default_health_interval_secs")]
    pub health_interval_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> u32 {
    1
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_long_stale_secs() -> u64 {
    600
}

fn default_short_stale_secs() -> u64 {
    300
}

fn default_health_interval_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            long_stale_secs: default_long_stale_secs(),
            short_stale_secs: default_short_stale_secs(),
            health_interval_secs: default_health_interval_secs(),
        }
    }
}

impl ApiSection {
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            long_stale: Duration::from_secs(self.long_stale_secs),
            short_stale: Duration::from_secs(self.short_stale_secs),
        }
    }

    pub fn client_options(&self) -> ClientOptions {
        ClientOptions::new(self.base_url.clone())
            .timeout(Duration::from_secs(self.timeout_secs.max(1)))
            .policy(self.fetch_policy())
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs.max(1))
    }
}

/// 从 config 目录加载配置，环境变量 FOLIO__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FOLIO__*（双下划线表示嵌套键，hero.roles 以逗号分隔）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        } else {
            tracing::warn!(path = %path.display(), "config file not found, skipped");
        }
    }

    builder = builder.add_source(env_source());

    let c = builder.build()?;
    c.try_deserialize()
}

/// FOLIO__* 环境变量；`FOLIO__HERO__ROLES` 按逗号拆成列表
fn env_source() -> config::Environment {
    config::Environment::with_prefix("FOLIO")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("hero.roles")
}
