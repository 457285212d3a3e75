//! 内容 API 错误

use thiserror::Error;

/// 请求内容 API 时可能出现的错误；UI 层只展示通用的加载失败提示
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ContentError {
    /// 是否为网络层超时
    pub fn is_timeout(&self) -> bool {
        matches!(self, ContentError::Http(e) if e.is_timeout())
    }
}
