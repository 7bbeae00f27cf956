use serde::{Deserialize, Serialize};

// ===================================================================
// Shared Enums
// ===================================================================

/// Author of a message in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Lifecycle state of a tool invocation part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Running,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

/// Toast style (used by `show_toast`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Info,
    Success,
    Warning,
    Error,
}

// ===================================================================
// Message parts (host JSON is camelCase throughout)
// ===================================================================

/// Model routing of a message. Re-sent verbatim on injection so the
/// session never switches provider or model behind the user's back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModelRef {
    #[serde(rename = "providerID")]
    pub provider_id: String,
    #[serde(rename = "modelID")]
    pub model_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextPart {
    pub text: String,
    /// Set by the host on text it generated itself (e.g. file contents).
    #[serde(default)]
    pub synthetic: bool,
    #[serde(default)]
    pub ignored: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilePart {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolState {
    pub status: ToolStatus,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolPart {
    pub tool: String,
    pub state: ToolState,
}

/// One part of a message, discriminated by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Part {
    Text(TextPart),
    File(FilePart),
    Tool(ToolPart),
    /// Reasoning, step markers, patches and anything newer.
    #[serde(other)]
    Other,
}

impl Part {
    /// Text of a part the user or model actually wrote.
    pub fn authored_text(&self) -> Option<&str> {
        match self {
            Part::Text(t) if !t.synthetic => Some(&t.text),
            _ => None,
        }
    }
}

// ===================================================================
// Session history (returned by `session_messages`)
// ===================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct MessageInfo {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionMessage {
    pub info: MessageInfo,
    #[serde(default)]
    pub parts: Vec<Part>,
}

// ===================================================================
// Host events (received as JSON lines)
// ===================================================================

/// The message half of a `chat.message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "sessionID")]
    pub session_id: String,
    #[serde(default)]
    pub model: Option<ModelRef>,
    #[serde(default)]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessageEvent {
    pub message: ChatMessage,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl ChatMessageEvent {
    /// Non-synthetic text parts joined by newlines, in part order.
    pub fn authored_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::authored_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDeletedProperties {
    pub info: SessionRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionDeletedEvent {
    pub properties: SessionDeletedProperties,
}

/// Top-level host event, tagged by the `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum HostEvent {
    #[serde(rename = "chat.message")]
    ChatMessage(ChatMessageEvent),
    #[serde(rename = "session.deleted")]
    SessionDeleted(SessionDeletedEvent),
    #[serde(other)]
    Other,
}

// ===================================================================
// Outbound payloads
// ===================================================================

/// A file the host should load into a session's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub mime: String,
    pub url: String,
    /// The reference as it was written, not the resolved path.
    pub filename: String,
}

/// Part of an outbound prompt, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptPart {
    File(Attachment),
}

/// Body of a prompt submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    /// When `true` the host adds the parts to context without replying.
    pub no_reply: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    pub parts: Vec<PromptPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Toast {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    pub variant: ToastVariant,
}
