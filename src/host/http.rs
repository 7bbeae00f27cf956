use super::{Host, HostError};
use crate::types::{PromptRequest, SessionMessage, Toast};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Serialize;
use serde_json::json;

/// `Host` over the host's local HTTP server.
#[derive(Clone)]
pub struct HttpHost {
    client: Client,
    base_url: String,
}

impl HttpHost {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{base}/session/{id}/message` with the ID encoded as one segment.
    fn session_url(&self, session_id: &str) -> Result<Url, HostError> {
        if session_id.is_empty() || session_id == "." || session_id == ".." {
            return Err(HostError::InvalidSessionId(session_id.to_string()));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| HostError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| HostError::InvalidBaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["session", session_id, "message"]);
        Ok(url)
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, HostError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HostError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn post_json<T: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), HostError> {
        tracing::debug!(path, "host call");
        self.send(path, self.client.post(self.url(path)).json(body))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl Host for HttpHost {
    async fn open_new_session(&self) -> Result<(), HostError> {
        self.post_json("/tui/execute-command", &json!({ "command": "session.new" }))
            .await
    }

    async fn append_draft(&self, text: &str) -> Result<(), HostError> {
        self.post_json("/tui/append-prompt", &json!({ "text": text }))
            .await
    }

    async fn clear_draft(&self) -> Result<(), HostError> {
        self.post_json("/tui/clear-prompt", &json!({})).await
    }

    async fn show_toast(&self, toast: &Toast) -> Result<(), HostError> {
        self.post_json("/tui/show-toast", toast).await
    }

    async fn session_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionMessage>, HostError> {
        let url = self.session_url(session_id)?;
        let path = url.path().to_string();
        tracing::debug!(path = %path, limit, "host call");
        let request = self.client.get(url).query(&[("limit", limit)]);
        let response = self.send(&path, request).await?;
        Ok(response.json().await?)
    }

    async fn prompt_silently(
        &self,
        session_id: &str,
        request: &PromptRequest,
    ) -> Result<(), HostError> {
        let url = self.session_url(session_id)?;
        let path = url.path().to_string();
        tracing::debug!(path = %path, parts = request.parts.len(), "host call");
        self.send(&path, self.client.post(url).json(request))
            .await
            .map(|_| ())
    }
}
