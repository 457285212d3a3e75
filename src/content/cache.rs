//! 查询缓存：按 QueryKey 存放最近一次成功的 JSON 响应
//!
//! 条目在 `stale_after` 内视为新鲜，直接返回；过期后由调用方重新请求并覆盖。
//! 不做并发请求合并：两个同时未命中的调用会各自发请求。

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::types::ProjectFilter;

/// 查询种类，决定路径与默认新鲜期
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Profile,
    Projects,
    FeaturedProjects,
    Skills,
    Experience,
    Certificates,
    Stats,
}

impl QueryKind {
    pub fn path(&self) -> &'static str {
        match self {
            QueryKind::Profile => "/portfolio/profile",
            QueryKind::Projects => "/portfolio/projects",
            QueryKind::FeaturedProjects => "/portfolio/projects/featured",
            QueryKind::Skills => "/portfolio/skills",
            QueryKind::Experience => "/portfolio/experience",
            QueryKind::Certificates => "/portfolio/certificates",
            QueryKind::Stats => "/portfolio/stats",
        }
    }

    /// 变化较快的数据（项目、统计）用短新鲜期
    pub fn is_volatile(&self) -> bool {
        matches!(
            self,
            QueryKind::Projects | QueryKind::FeaturedProjects | QueryKind::Stats
        )
    }
}

/// 缓存键：种类 + 参数
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: QueryKind,
    params: Vec<(&'static str, String)>,
}

impl QueryKey {
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            params: Vec::new(),
        }
    }

    pub fn projects(filter: &ProjectFilter) -> Self {
        Self {
            kind: QueryKind::Projects,
            params: filter.query_pairs(),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.path())?;
        for (i, (k, v)) in self.params.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    stale_after: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.fetched_at) < self.stale_after
    }
}

/// 进程内查询缓存（不落盘）
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 取新鲜条目；过期或不存在返回 None
    pub async fn get(&self, key: &QueryKey) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.is_fresh(Instant::now()))
            .map(|e| e.value.clone())
    }

    pub async fn insert(&self, key: QueryKey, value: Value, stale_after: Duration) {
        let entry = CacheEntry {
            value,
            fetched_at: Instant::now(),
            stale_after,
        };
        self.entries.write().await.insert(key, entry);
    }

    pub async fn invalidate(&self, key: &QueryKey) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// 按种类失效（不论参数）
    pub async fn invalidate_kind(&self, kind: QueryKind) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|k, _| k.kind != kind);
        before - entries.len()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
