//! 视图状态：内容加载结果与每帧渲染用的 PortfolioView
//!
//! 内容由后台任务拉取，经 watch 推给渲染循环；加载失败只记一个通用提示，不向界面暴露底层错误。

use std::sync::Arc;

use tokio::sync::watch;

use crate::content::{ApiStatus, ContentClient, ProfileInfo, Project, ProjectFilter};
use crate::rotator::Phase;

/// 异步加载中的数据
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loadable::Failed)
    }
}

/// 首页展示的内容
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentState {
    pub profile: Loadable<ProfileInfo>,
    pub projects: Loadable<Vec<Project>>,
}

/// 一帧的完整输入
#[derive(Clone, Debug)]
pub struct PortfolioView {
    /// 资料未就绪时的标题
    pub fallback_name: String,
    pub role_text: String,
    pub phase: Phase,
    pub content: ContentState,
    pub api_status: ApiStatus,
}

impl PortfolioView {
    pub fn display_name(&self) -> &str {
        self.content
            .profile
            .ready()
            .map(|p| p.full_name.as_str())
            .unwrap_or(&self.fallback_name)
    }
}

/// 拉取资料与精选项目，逐项写回 content_tx
pub async fn load_content(client: Arc<ContentClient>, content_tx: &watch::Sender<ContentState>) {
    content_tx.send_modify(|s| *s = ContentState::default());

    let profile = match client.profile().await {
        Ok(p) => Loadable::Ready(p),
        Err(e) => {
            tracing::warn!(error = %e, timeout = e.is_timeout(), "failed to load profile");
            Loadable::Failed
        }
    };
    content_tx.send_modify(|s| s.profile = profile);

    let projects = match client.projects(&ProjectFilter::default().featured_only()).await {
        Ok(list) => Loadable::Ready(list.projects),
        Err(e) => {
            tracing::warn!(error = %e, timeout = e.is_timeout(), "failed to load projects");
            Loadable::Failed
        }
    };
    content_tx.send_modify(|s| s.projects = projects);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> ProfileInfo {
        serde_json::from_value(serde_json::json!({
            "full_name": name,
            "title": "Developer"
        }))
        .unwrap()
    }

    #[test]
    fn test_display_name_falls_back() {
        let mut view = PortfolioView {
            fallback_name: "Portfolio".into(),
            role_text: String::new(),
            phase: Phase::Typing,
            content: ContentState::default(),
            api_status: ApiStatus::Connecting,
        };
        assert_eq!(view.display_name(), "Portfolio");
        view.content.profile = Loadable::Ready(profile("Ada Lovelace"));
        assert_eq!(view.display_name(), "Ada Lovelace");
        view.content.profile = Loadable::Failed;
        assert_eq!(view.display_name(), "Portfolio");
        assert!(view.content.profile.is_failed());
    }
}
