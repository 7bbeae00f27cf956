use crate::host::Host;
use crate::types::{Part, Role, SessionMessage, ToolStatus};

// ===================================================================
// Read limits
// ===================================================================

/// Messages shown when no limit is given.
pub const DEFAULT_READ_LIMIT: usize = 100;
/// Upper bound on any requested limit.
pub const MAX_READ_LIMIT: usize = 500;

/// Resolve a requested read limit: `default` when absent, then clamped
/// to `1..=MAX_READ_LIMIT`.
pub fn clamp_read_limit(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_READ_LIMIT)
}

// ===================================================================
// Formatting
// ===================================================================

fn push_user_parts(out: &mut Vec<String>, parts: &[Part]) {
    for part in parts {
        match part {
            Part::Text(t) if !t.synthetic && !t.ignored => out.push(t.text.clone()),
            Part::File(f) => match &f.filename {
                Some(name) => out.push(format!("[Attached file: {name}]")),
                None => out.push("[Attached file]".into()),
            },
            _ => {}
        }
    }
}

fn push_assistant_parts(out: &mut Vec<String>, parts: &[Part]) {
    for part in parts {
        match part {
            Part::Text(t) => out.push(t.text.clone()),
            Part::Tool(tool) if tool.state.status == ToolStatus::Completed => {
                let title = tool.state.title.as_deref().unwrap_or_default();
                out.push(format!("[Tool: {}] {title}", tool.tool).trim_end().to_string());
            }
            _ => {}
        }
    }
}

/// Render `messages` as a compact plain-text transcript.
///
/// The footer says whether the window was full: when `messages.len()`
/// reaches `limit` older history may exist beyond it.
pub fn format_transcript(messages: &[SessionMessage], limit: usize) -> String {
    let mut sections: Vec<String> = Vec::with_capacity(messages.len() + 1);

    for msg in messages {
        let mut lines = Vec::new();
        match msg.info.role {
            Role::User => {
                lines.push("## User".to_string());
                push_user_parts(&mut lines, &msg.parts);
            }
            Role::Assistant => {
                lines.push("## Assistant".to_string());
                push_assistant_parts(&mut lines, &msg.parts);
            }
        }
        sections.push(lines.join("\n"));
    }

    let footer = if messages.len() >= limit {
        format!("(Showing {limit} most recent messages. Use a higher limit to see more.)")
    } else {
        format!("(End of session - {} messages)", messages.len())
    };
    sections.push(footer);

    sections.join("\n\n").trim().to_string()
}

// ===================================================================
// Reading a session
// ===================================================================

pub const NO_MESSAGES: &str = "Session has no messages or does not exist.";

/// Fetch and format a session's history. Never fails: host errors come
/// back as a readable sentence.
pub async fn read_session<H: Host + ?Sized>(host: &H, session_id: &str, limit: usize) -> String {
    match host.session_messages(session_id, limit).await {
        Ok(messages) if messages.is_empty() => NO_MESSAGES.to_string(),
        Ok(messages) => format_transcript(&messages, limit),
        Err(e) => {
            tracing::debug!(session_id, "reading session failed: {e}");
            format!("Could not read session {session_id}: {e}")
        }
    }
}

#[cfg(test)]
mod tests;
