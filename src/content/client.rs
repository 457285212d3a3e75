//! 内容 API 客户端
//!
//! 基址规范化为 `.../api/v1`；每个读取接口先查缓存，未命中或过期才请求，
//! 失败（网络、非 2xx、解析）按策略重试一次。`/health` 挂在根路径下，不缓存也不重试。

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cache::{QueryCache, QueryKey, QueryKind};
use super::error::ContentError;
use super::types::{
    Certificate, Experience, HealthStatus, PortfolioStats, ProfileInfo, Project, ProjectFilter,
    ProjectListResponse, SkillsGrouped,
};

const API_PREFIX: &str = "/api/v1";

/// 重试与新鲜期策略
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchPolicy {
    /// 首次失败后的额外尝试次数
    pub retries: u32,
    pub retry_delay: Duration,
    /// 资料、技能、经历、证书
    pub long_stale: Duration,
    /// 项目、统计
    pub short_stale: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            retries: 1,
            retry_delay: Duration::from_millis(1000),
            long_stale: Duration::from_secs(10 * 60),
            short_stale: Duration::from_secs(5 * 60),
        }
    }
}

impl FetchPolicy {
    pub fn stale_after(&self, kind: QueryKind) -> Duration {
        if kind.is_volatile() {
            self.short_stale
        } else {
            self.long_stale
        }
    }
}

/// 客户端构造参数
#[derive(Clone, Debug)]
pub struct ClientOptions {
    /// 后端地址，可带或不带 `/api/v1`
    pub base_url: String,
    pub timeout: Duration,
    pub policy: FetchPolicy,
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            policy: FetchPolicy::default(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn trimmed_base(url: &str) -> Result<&str, ContentError> {
    let url = url.trim().trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ContentError::InvalidBaseUrl(url.to_string()));
    }
    Ok(url)
}

/// 规范化 API 基址：去掉末尾斜杠，缺少 `/api/v1` 时补上
pub fn normalize_api_base(url: &str) -> Result<String, ContentError> {
    let url = trimmed_base(url)?;
    if url.ends_with(API_PREFIX) {
        Ok(url.to_string())
    } else {
        Ok(format!("{url}{API_PREFIX}"))
    }
}

/// 健康检查地址：站点根 + `/health`
pub fn health_url(url: &str) -> Result<String, ContentError> {
    let url = trimmed_base(url)?;
    let origin = url.strip_suffix(API_PREFIX).unwrap_or(url);
    Ok(format!("{origin}/health"))
}

/// 作品集内容客户端，内部持有查询缓存，可在任务间共享（`Arc<ContentClient>`）
pub struct ContentClient {
    http: Client,
    api_base: String,
    health_url: String,
    policy: FetchPolicy,
    cache: QueryCache,
}

impl ContentClient {
    pub fn new(options: ClientOptions) -> Result<Self, ContentError> {
        let api_base = normalize_api_base(&options.base_url)?;
        let health_url = health_url(&options.base_url)?;
        let http = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;
        tracing::debug!(api_base = %api_base, health_url = %health_url, "content client ready");
        Ok(Self {
            http,
            api_base,
            health_url,
            policy: options.policy,
            cache: QueryCache::new(),
        })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn health_endpoint(&self) -> &str {
        &self.health_url
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn profile(&self) -> Result<ProfileInfo, ContentError> {
        self.cached(QueryKey::new(QueryKind::Profile)).await
    }

    pub async fn projects(&self, filter: &ProjectFilter) -> Result<ProjectListResponse, ContentError> {
        self.cached(QueryKey::projects(filter)).await
    }

    pub async fn featured_projects(&self) -> Result<Vec<Project>, ContentError> {
        self.cached(QueryKey::new(QueryKind::FeaturedProjects)).await
    }

    pub async fn skills(&self) -> Result<SkillsGrouped, ContentError> {
        self.cached(QueryKey::new(QueryKind::Skills)).await
    }

    pub async fn experience(&self) -> Result<Vec<Experience>, ContentError> {
        self.cached(QueryKey::new(QueryKind::Experience)).await
    }

    pub async fn certificates(&self) -> Result<Vec<Certificate>, ContentError> {
        self.cached(QueryKey::new(QueryKind::Certificates)).await
    }

    pub async fn stats(&self) -> Result<PortfolioStats, ContentError> {
        self.cached(QueryKey::new(QueryKind::Stats)).await
    }

    /// 单次健康检查
    pub async fn health(&self) -> Result<HealthStatus, ContentError> {
        let value = self.get_json(&self.health_url, &[]).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        self.cache.invalidate(key).await
    }

    /// 失效某一种查询的全部参数组合
    pub async fn invalidate_kind(&self, kind: QueryKind) -> usize {
        self.cache.invalidate_kind(kind).await
    }

    pub async fn invalidate_all(&self) {
        self.cache.clear().await;
    }

    async fn cached<T: DeserializeOwned>(&self, key: QueryKey) -> Result<T, ContentError> {
        if let Some(value) = self.cache.get(&key).await {
            match serde_json::from_value::<T>(value) {
                Ok(hit) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(hit);
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "cached entry no longer decodes"),
            }
        }

        let (parsed, raw) = self.fetch_with_retry::<T>(&key).await?;
        let stale_after = self.policy.stale_after(key.kind());
        self.cache.insert(key, raw, stale_after).await;
        Ok(parsed)
    }

    async fn fetch_with_retry<T: DeserializeOwned>(
        &self,
        key: &QueryKey,
    ) -> Result<(T, Value), ContentError> {
        let url = format!("{}{}", self.api_base, key.kind().path());
        let max_attempts = self.policy.retries + 1;
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match self.get_json(&url, key.params()).await {
                Ok(raw) => serde_json::from_value::<T>(raw.clone())
                    .map(|parsed| (parsed, raw))
                    .map_err(ContentError::from),
                Err(e) => Err(e),
            };
            match result {
                Ok(ok) => {
                    tracing::debug!(key = %key, attempt, "fetched");
                    return Ok(ok);
                }
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(key = %key, attempt, error = %e, "fetch failed, retrying");
                    tokio::time::sleep(self.policy.retry_delay).await;
                }
                Err(e) => {
                    tracing::error!(key = %key, attempt, error = %e, "fetch failed");
                    return Err(e);
                }
            }
        }
    }

    async fn get_json(&self, url: &str, query: &[(&'static str, String)]) -> Result<Value, ContentError> {
        let resp = self.http.get(url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
