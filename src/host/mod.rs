//! Calls this crate makes back into the host application.

mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpHost;

use crate::types::{PromptRequest, SessionMessage, Toast};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("request to host failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("invalid session id {0:?}")]
    InvalidSessionId(String),
    #[error("invalid host url {0}")]
    InvalidBaseUrl(String),
    #[error("host rejected call: {0}")]
    Rejected(String),
}

/// Outbound host API. Every call is attempted exactly once.
#[async_trait]
pub trait Host: Send + Sync {
    /// Switch the UI to a fresh, empty session.
    async fn open_new_session(&self) -> Result<(), HostError>;

    /// Append `text` to the draft input of the active session.
    async fn append_draft(&self, text: &str) -> Result<(), HostError>;

    async fn clear_draft(&self) -> Result<(), HostError>;

    async fn show_toast(&self, toast: &Toast) -> Result<(), HostError>;

    /// Up to `limit` most recent messages of a session, oldest first.
    async fn session_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionMessage>, HostError>;

    /// Submit `request` to a session.
    async fn prompt_silently(
        &self,
        session_id: &str,
        request: &PromptRequest,
    ) -> Result<(), HostError>;
}
