use crate::host::{Host, HostError};
use crate::types::{Toast, ToastVariant};
use anyhow::{Context, Result};
use minijinja::{Environment, context};
use std::time::Duration;

/// Returned to the model once the draft is in place.
pub const CONFIRMATION: &str =
    "Handoff prompt created in new session. Review and edit before sending.";

/// Body of the `/handoff` command. `{{ goal }}` is whatever the user typed
/// after the command.
pub const HANDOFF_COMMAND: &str = r#"You are writing a handoff message so the work can continue in a fresh session.

User's goal: {{ goal }}

A new session normally burns its first turns rediscovering the codebase: searching, grepping, opening files. This session already knows which files matter, so the handoff should hand that knowledge over directly.

Review this conversation and keep only what is needed to carry on.

## OUTPUT FORMAT

1. FILE REFERENCES

   Put every relevant @file reference on ONE line, separated by spaces.

   Each @file is loaded into the next session's context automatically, so nothing has to be searched for again.

   Include files that will change, dependencies being touched, related tests, configuration and key docs. Err on the side of including a file; a missing one costs another search. Aim for 8-15 files, up to 20 for larger changes.

2. CONTEXT AND GOAL

   After the file line, explain what is being worked on and whatever context the next session needs. Shape it to the conversation: a task list, findings, a short paragraph or detailed steps.

   Keep: decisions, constraints, user preferences, technical patterns.

   Drop: back-and-forth, abandoned approaches, meta-commentary.

If the user asked for something to be kept, keep it.

---

Once the handoff message is written, IMMEDIATELY call handoff_session with the complete message as the prompt:
`handoff_session(prompt="...")`"#;

/// Template for the `/handoff` command: either inline text or a path to a
/// template file (relative to `.handoff/`).
///
/// ```toml
/// [command_template]
/// inline = "Summarize for: {{ goal }}"
///
/// # or
///
/// [command_template]
/// file = "handoff.tmpl"
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CommandTemplate {
    Inline(String),
    File(String),
}

/// Render the `/handoff` command body for `goal`.
pub fn render_command(template: &str, goal: &str) -> Result<String> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(template)
        .context("parsing handoff command template")?;
    tmpl.render(context! { goal })
        .context("rendering handoff command template")
}

/// Open a new session with `prompt` waiting as an editable draft.
///
/// `settle` covers the gap between the host switching sessions and its
/// input box following; without it the draft can land in the old session.
pub async fn prepare_handoff<H: Host + ?Sized>(
    host: &H,
    prompt: &str,
    settle: Duration,
) -> Result<String, HostError> {
    host.clear_draft().await?;
    host.open_new_session().await?;
    tokio::time::sleep(settle).await;
    host.append_draft(prompt).await?;
    host.show_toast(&Toast {
        title: Some("Handoff Ready".into()),
        message: "Review and edit the handoff prompt, then send it".into(),
        variant: ToastVariant::Success,
    })
    .await?;

    tracing::info!(chars = prompt.len(), "handoff draft prepared");
    Ok(CONFIRMATION.to_string())
}
