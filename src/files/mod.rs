//! `@file` references: pulling them out of free text and turning the ones
//! that exist on disk into attachments.

use crate::types::Attachment;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

/// Token following the `@` sigil. Periods are allowed inside a token only
/// when more non-period text follows, so `@x.` yields `x` while
/// `@src/a.test.ts` stays whole. One leading period is allowed for
/// dotfiles and `./` paths.
const REFERENCE_PATTERN: &str = r"@(\.?[^\s`,.]*(?:\.[^\s`,.]+)*)";

static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();

fn reference_re() -> &'static Regex {
    REFERENCE_RE.get_or_init(|| Regex::new(REFERENCE_PATTERN).expect("reference pattern is valid"))
}

/// An `@` directly after a word character or backtick belongs to an email
/// address, an identifier or a quoted path.
fn sigil_allowed(text: &str, at: usize) -> bool {
    match text[..at].chars().next_back() {
        Some(c) => !(c.is_ascii_alphanumeric() || c == '_' || c == '`'),
        None => true,
    }
}

/// Collect every `@file` reference in `text`.
///
/// Tokens are kept exactly as written; duplicates collapse.
pub fn parse_file_references(text: &str) -> BTreeSet<String> {
    let re = reference_re();
    let mut refs = BTreeSet::new();
    let mut pos = 0;

    while let Some(caps) = re.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        if !sigil_allowed(text, whole.start()) {
            // Retry just past the rejected sigil; a valid `@` may sit
            // inside the text this match swallowed.
            pos = whole.start() + 1;
            continue;
        }
        if let Some(token) = caps.get(1).filter(|m| !m.is_empty()) {
            refs.insert(token.as_str().to_string());
        }
        pos = whole.end();
    }

    refs
}

/// Resolve `reference` against `root` lexically: absolute references
/// replace the root, `.` disappears and `..` drops one segment.
/// Symlinks are not followed.
pub fn resolve_reference(root: &Path, reference: &str) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in root.join(reference).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Build attachments for the references that exist under `root`.
///
/// Anything that cannot be probed (missing, unreadable, bad path) is
/// skipped without error.
pub async fn build_file_parts(root: &Path, refs: &BTreeSet<String>) -> Vec<Attachment> {
    let mut parts = Vec::with_capacity(refs.len());

    for reference in refs {
        let path = resolve_reference(root, reference);
        match tokio::fs::metadata(&path).await {
            Ok(_) => parts.push(Attachment {
                mime: "text/plain".into(),
                url: format!("file://{}", path.display()),
                filename: reference.clone(),
            }),
            Err(e) => {
                tracing::trace!(reference = %reference, path = %path.display(), "skipping reference: {e}");
            }
        }
    }

    parts
}
