use super::*;
use crate::host::mock::{HostCall, RecordingHost};
use serde_json::json;

fn message(value: serde_json::Value) -> SessionMessage {
    serde_json::from_value(value).unwrap()
}

fn user(text: &str) -> SessionMessage {
    message(json!({
        "info": { "role": "user" },
        "parts": [{ "type": "text", "text": text }]
    }))
}

fn assistant(text: &str) -> SessionMessage {
    message(json!({
        "info": { "role": "assistant" },
        "parts": [{ "type": "text", "text": text }]
    }))
}

// =================================================================
// clamp_read_limit
// =================================================================

#[test]
fn limit_defaults_when_unspecified() {
    assert_eq!(clamp_read_limit(None, DEFAULT_READ_LIMIT), 100);
    assert_eq!(clamp_read_limit(None, 40), 40);
}

#[test]
fn limit_is_clamped() {
    assert_eq!(clamp_read_limit(Some(10_000), DEFAULT_READ_LIMIT), 500);
    assert_eq!(clamp_read_limit(Some(500), DEFAULT_READ_LIMIT), 500);
    assert_eq!(clamp_read_limit(Some(0), DEFAULT_READ_LIMIT), 1);
    assert_eq!(clamp_read_limit(Some(7), DEFAULT_READ_LIMIT), 7);
}

// =================================================================
// format_transcript
// =================================================================

#[test]
fn empty_transcript_is_just_the_footer() {
    assert_eq!(
        format_transcript(&[], DEFAULT_READ_LIMIT),
        "(End of session - 0 messages)"
    );
}

#[test]
fn full_window_gets_truncation_footer() {
    let messages: Vec<SessionMessage> = (0..5).map(|i| user(&format!("m{i}"))).collect();
    let out = format_transcript(&messages, 5);
    assert!(
        out.ends_with("(Showing 5 most recent messages. Use a higher limit to see more.)"),
        "got: {out}"
    );
}

#[test]
fn partial_window_gets_completion_footer() {
    let messages: Vec<SessionMessage> = (0..4).map(|i| user(&format!("m{i}"))).collect();
    let out = format_transcript(&messages, 5);
    assert!(out.ends_with("(End of session - 4 messages)"), "got: {out}");
}

#[test]
fn truncation_uses_raw_count() {
    // More messages than the limit still reports the limit.
    let messages: Vec<SessionMessage> = (0..8).map(|i| user(&format!("m{i}"))).collect();
    let out = format_transcript(&messages, 5);
    assert!(out.contains("Showing 5 most recent messages"), "got: {out}");
}

#[test]
fn sections_are_blank_line_separated() {
    let out = format_transcript(&[user("hello"), assistant("hi there")], DEFAULT_READ_LIMIT);
    assert_eq!(
        out,
        "## User\nhello\n\n## Assistant\nhi there\n\n(End of session - 2 messages)"
    );
}

#[test]
fn user_parts_skip_synthetic_and_ignored_text() {
    let msg = message(json!({
        "info": { "role": "user" },
        "parts": [
            { "type": "text", "text": "visible" },
            { "type": "text", "text": "tool output", "synthetic": true },
            { "type": "text", "text": "hidden", "ignored": true },
            { "type": "file", "filename": "src/main.rs", "url": "file:///r/src/main.rs" },
            { "type": "file", "url": "data:image/png;base64,AAAA" }
        ]
    }));

    let out = format_transcript(&[msg], DEFAULT_READ_LIMIT);
    assert_eq!(
        out,
        "## User\nvisible\n[Attached file: src/main.rs]\n[Attached file]\n\n\
         (End of session - 1 messages)"
    );
}

#[test]
fn assistant_parts_show_completed_tools_only() {
    let msg = message(json!({
        "info": { "role": "assistant" },
        "parts": [
            { "type": "reasoning", "text": "thinking..." },
            { "type": "text", "text": "Let me look." },
            { "type": "tool", "tool": "read", "state": { "status": "completed", "title": "src/lib.rs" } },
            { "type": "tool", "tool": "bash", "state": { "status": "running" } },
            { "type": "tool", "tool": "edit", "state": { "status": "error", "error": "boom" } },
            { "type": "tool", "tool": "todowrite", "state": { "status": "completed" } }
        ]
    }));

    let out = format_transcript(&[msg], DEFAULT_READ_LIMIT);
    assert_eq!(
        out,
        "## Assistant\nLet me look.\n[Tool: read] src/lib.rs\n[Tool: todowrite]\n\n\
         (End of session - 1 messages)"
    );
}

#[test]
fn output_is_trimmed() {
    let out = format_transcript(&[user("  padded  \n")], DEFAULT_READ_LIMIT);
    assert!(out.starts_with("## User"));
    assert!(!out.ends_with('\n'));
}

// =================================================================
// read_session
// =================================================================

#[tokio::test]
async fn read_session_formats_history() {
    let host = RecordingHost::new().with_messages(vec![user("fix it"), assistant("fixed")]);

    let out = read_session(&host, "ses_1", 50).await;

    assert!(out.starts_with("## User\nfix it"), "got: {out}");
    assert!(out.ends_with("(End of session - 2 messages)"));
    match host.calls().as_slice() {
        [HostCall::SessionMessages { session_id, limit }] => {
            assert_eq!(session_id, "ses_1");
            assert_eq!(*limit, 50);
        }
        other => panic!("unexpected calls: {other:?}"),
    }
}

#[tokio::test]
async fn read_session_reports_empty_sessions() {
    let host = RecordingHost::new();
    assert_eq!(read_session(&host, "ses_x", 100).await, NO_MESSAGES);
}

#[tokio::test]
async fn read_session_turns_errors_into_text() {
    let host = RecordingHost::failing("no such session");
    assert_eq!(
        read_session(&host, "ses_bad", 100).await,
        "Could not read session ses_bad: host rejected call: no such session"
    );
}
