//! Watches chat traffic for handoff continuations and loads the files they
//! reference into the new session, once per session.
//!
//! The decision half ([`Router`]) is synchronous and owns the only
//! long-lived state. The delivery half ([`Injection`]) does the file
//! probes and the host call. [`spawn_router`] runs the router as a
//! single-writer task so events are applied strictly in arrival order.

use crate::files::{build_file_parts, parse_file_references};
use crate::host::{Host, HostError};
use crate::types::{ChatMessageEvent, ModelRef, PromptPart, PromptRequest};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

/// Phrase that opens every handoff prompt.
pub const CONTINUATION_MARKER: &str = "Continuing work from session";

const QUEUE_DEPTH: usize = 64;

// ===================================================================
// Processed sessions
// ===================================================================

/// Sessions that have already had their handoff files injected.
///
/// An ID enters on the first continuation message seen for it and leaves
/// only when the host reports the session deleted.
#[derive(Debug, Default)]
pub struct ProcessedSessions {
    ids: HashSet<String>,
}

impl ProcessedSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.ids.contains(session_id)
    }

    /// Returns `false` if the session was already marked.
    pub fn mark(&mut self, session_id: &str) -> bool {
        self.ids.insert(session_id.to_string())
    }

    /// Returns `false` if the session was not marked.
    pub fn forget(&mut self, session_id: &str) -> bool {
        self.ids.remove(session_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ===================================================================
// Decision
// ===================================================================

/// Pending file injection for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    pub session_id: String,
    pub model: Option<ModelRef>,
    pub agent: Option<String>,
    pub references: BTreeSet<String>,
}

pub struct Router {
    processed: ProcessedSessions,
}

impl Router {
    pub fn new(processed: ProcessedSessions) -> Self {
        Self { processed }
    }

    pub fn processed(&self) -> &ProcessedSessions {
        &self.processed
    }

    /// Decide what a completed chat message should trigger.
    ///
    /// The session is marked before this returns, so a second event for it
    /// is refused even while the first injection is still in flight.
    /// Messages without the marker leave the session untouched.
    pub fn on_chat_message(&mut self, event: &ChatMessageEvent) -> Option<Injection> {
        let session_id = &event.message.session_id;
        if self.processed.contains(session_id) {
            return None;
        }

        let text = event.authored_text();
        if !text.contains(CONTINUATION_MARKER) {
            return None;
        }

        self.processed.mark(session_id);
        tracing::debug!(session_id = %session_id, "handoff continuation detected");

        let references = parse_file_references(&text);
        if references.is_empty() {
            return None;
        }

        Some(Injection {
            session_id: session_id.clone(),
            model: event.message.model.clone(),
            agent: event.message.agent.clone(),
            references,
        })
    }

    pub fn on_session_deleted(&mut self, session_id: &str) {
        if self.processed.forget(session_id) {
            tracing::debug!(session_id, "forgot deleted session");
        }
    }
}

// ===================================================================
// Delivery
// ===================================================================

impl Injection {
    /// Attach the referenced files that exist under `project_root` to the
    /// session without producing a reply. Returns how many were attached.
    pub async fn deliver<H: Host + ?Sized>(
        self,
        host: &H,
        project_root: &Path,
    ) -> Result<usize, HostError> {
        let attachments = build_file_parts(project_root, &self.references).await;
        if attachments.is_empty() {
            tracing::debug!(session_id = %self.session_id, "no referenced files exist");
            return Ok(0);
        }

        let count = attachments.len();
        let request = PromptRequest {
            no_reply: true,
            model: self.model,
            agent: self.agent,
            parts: attachments.into_iter().map(PromptPart::File).collect(),
        };
        host.prompt_silently(&self.session_id, &request).await?;
        Ok(count)
    }
}

// ===================================================================
// Actor
// ===================================================================

#[derive(Debug)]
enum RouterEvent {
    ChatMessage(ChatMessageEvent),
    SessionDeleted(String),
}

/// Sending side of a running router.
pub struct RouterHandle {
    events: mpsc::Sender<RouterEvent>,
    task: JoinHandle<Router>,
}

impl RouterHandle {
    pub async fn chat_message(&self, event: ChatMessageEvent) -> anyhow::Result<()> {
        self.send(RouterEvent::ChatMessage(event)).await
    }

    pub async fn session_deleted(&self, session_id: impl Into<String>) -> anyhow::Result<()> {
        self.send(RouterEvent::SessionDeleted(session_id.into()))
            .await
    }

    async fn send(&self, event: RouterEvent) -> anyhow::Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("router task has stopped"))
    }

    /// Stop accepting events, wait for in-flight injections, and hand the
    /// router back.
    pub async fn shutdown(self) -> anyhow::Result<Router> {
        drop(self.events);
        self.task
            .await
            .map_err(|e| anyhow::anyhow!("router task failed: {e}"))
    }
}

/// Run `router` on its own task. Injections are spawned so slow file
/// probes or host calls never hold up later events; their failures are
/// logged and dropped.
pub fn spawn_router(router: Router, host: Arc<dyn Host>, project_root: PathBuf) -> RouterHandle {
    let (events, rx) = mpsc::channel(QUEUE_DEPTH);
    let task = tokio::spawn(run_router(router, host, project_root, rx));
    RouterHandle { events, task }
}

async fn run_router(
    mut router: Router,
    host: Arc<dyn Host>,
    project_root: PathBuf,
    mut rx: mpsc::Receiver<RouterEvent>,
) -> Router {
    let project_root = Arc::new(project_root);
    let mut inflight = JoinSet::new();

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    RouterEvent::ChatMessage(msg) => {
                        if let Some(injection) = router.on_chat_message(&msg) {
                            let host = Arc::clone(&host);
                            let root = Arc::clone(&project_root);
                            inflight.spawn(deliver_logged(injection, host, root));
                        }
                    }
                    RouterEvent::SessionDeleted(id) => router.on_session_deleted(&id),
                }
            }
            Some(joined) = inflight.join_next(), if !inflight.is_empty() => {
                if let Err(e) = joined {
                    tracing::warn!("injection task panicked: {e}");
                }
            }
        }
    }

    while let Some(joined) = inflight.join_next().await {
        if let Err(e) = joined {
            tracing::warn!("injection task panicked: {e}");
        }
    }

    router
}

async fn deliver_logged(injection: Injection, host: Arc<dyn Host>, root: Arc<PathBuf>) {
    let session_id = injection.session_id.clone();
    match injection.deliver(host.as_ref(), &root).await {
        Ok(0) => {}
        Ok(count) => tracing::info!(session_id = %session_id, count, "injected handoff files"),
        Err(e) => tracing::warn!(session_id = %session_id, "handoff file injection failed: {e}"),
    }
}
