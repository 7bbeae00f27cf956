//! In-memory `Host` that records every call.

use super::{Host, HostError};
use crate::types::{PromptRequest, SessionMessage, Toast};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum HostCall {
    OpenNewSession,
    AppendDraft(String),
    ClearDraft,
    ShowToast(Toast),
    SessionMessages { session_id: String, limit: usize },
    PromptSilently { session_id: String, request: PromptRequest },
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    messages: Vec<SessionMessage>,
    /// Every call fails with `HostError::Rejected` when set.
    fail_with: Option<String>,
    /// Delay applied to `prompt_silently` before it records.
    prompt_latency: Option<Duration>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn with_messages(mut self, messages: Vec<SessionMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_prompt_latency(mut self, latency: Duration) -> Self {
        self.prompt_latency = Some(latency);
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<(String, PromptRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::PromptSilently { session_id, request } => Some((session_id, request)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) -> Result<(), HostError> {
        self.calls.lock().unwrap().push(call);
        match &self.fail_with {
            Some(reason) => Err(HostError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Host for RecordingHost {
    async fn open_new_session(&self) -> Result<(), HostError> {
        self.record(HostCall::OpenNewSession)
    }

    async fn append_draft(&self, text: &str) -> Result<(), HostError> {
        self.record(HostCall::AppendDraft(text.to_string()))
    }

    async fn clear_draft(&self) -> Result<(), HostError> {
        self.record(HostCall::ClearDraft)
    }

    async fn show_toast(&self, toast: &Toast) -> Result<(), HostError> {
        self.record(HostCall::ShowToast(toast.clone()))
    }

    async fn session_messages(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<SessionMessage>, HostError> {
        self.record(HostCall::SessionMessages {
            session_id: session_id.to_string(),
            limit,
        })?;
        let skip = self.messages.len().saturating_sub(limit);
        Ok(self.messages[skip..].to_vec())
    }

    async fn prompt_silently(
        &self,
        session_id: &str,
        request: &PromptRequest,
    ) -> Result<(), HostError> {
        if let Some(latency) = self.prompt_latency {
            tokio::time::sleep(latency).await;
        }
        self.record(HostCall::PromptSilently {
            session_id: session_id.to_string(),
            request: request.clone(),
        })
    }
}
