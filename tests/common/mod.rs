#![allow(dead_code)]

use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub const MARKER: &str = "Continuing work from session";

/// Run the binary in `cwd` against the host at `host_url`, feeding `stdin`.
pub fn run_cli(cwd: &Path, host_url: &str, args: &[&str], stdin: &str) -> (i32, String, String) {
    run_cli_bytes(cwd, host_url, args, stdin.as_bytes())
}

/// Like [`run_cli`], for stdin that need not be valid UTF-8.
pub fn run_cli_bytes(
    cwd: &Path,
    host_url: &str,
    args: &[&str],
    stdin: &[u8],
) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_handoff"))
        .arg("--cwd")
        .arg(cwd)
        .arg("--host-url")
        .arg(host_url)
        .args(args)
        .env_remove("HANDOFF_LOG")
        .env_remove("HANDOFF_HOST_URL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn binary");

    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(stdin)
        .unwrap();

    let output = child.wait_with_output().unwrap();
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

/// Create a temp dir containing a git repo with an initial commit and return it.
/// The `TempDir` must be kept alive for the duration of the test.
pub fn temp_git_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();

    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    let sig = repo.signature().unwrap();
    let tree_oid = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
        .unwrap();

    dir
}

/// Canonical path of `rel` inside the repo, as the binary will resolve it.
pub fn resolved(repo: &Path, rel: &str) -> PathBuf {
    std::fs::canonicalize(repo).unwrap().join(rel)
}

pub fn session_id() -> String {
    format!("ses_{}", uuid::Uuid::new_v4().simple())
}

/// One `chat.message` event as a JSON line.
pub fn chat_event(session_id: &str, text: &str) -> String {
    json!({
        "type": "chat.message",
        "message": {
            "sessionID": session_id,
            "model": { "providerID": "anthropic", "modelID": "claude-sonnet-4" },
            "agent": "build"
        },
        "parts": [{ "type": "text", "text": text }]
    })
    .to_string()
}

/// One `session.deleted` event as a JSON line.
pub fn deleted_event(session_id: &str) -> String {
    json!({
        "type": "session.deleted",
        "properties": { "info": { "id": session_id } }
    })
    .to_string()
}

pub fn lines(events: &[String]) -> String {
    let mut out = events.join("\n");
    out.push('\n');
    out
}
