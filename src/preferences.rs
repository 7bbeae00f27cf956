use crate::handoff::CommandTemplate;
use crate::transcript::{DEFAULT_READ_LIMIT, MAX_READ_LIMIT};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

const FILENAME: &str = "handoff.toml";

const DEFAULT_HOST_URL: &str = "http://127.0.0.1:4096";

/// User-facing preferences stored in `.handoff/handoff.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Preferences {
    /// Messages fetched by `read-session` when no limit is given.
    /// Always clamped to 500.
    #[serde(default = "default_read_limit")]
    pub read_limit: usize,

    /// Pause between opening the new session and writing the draft.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Base URL of the host's HTTP server.
    #[serde(default = "default_host_url")]
    pub host_url: String,

    /// Replaces the built-in `/handoff` command body when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_template: Option<CommandTemplate>,
}

fn default_read_limit() -> usize {
    DEFAULT_READ_LIMIT
}

fn default_settle_delay_ms() -> u64 {
    150
}

fn default_host_url() -> String {
    DEFAULT_HOST_URL.into()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            read_limit: default_read_limit(),
            settle_delay_ms: default_settle_delay_ms(),
            host_url: default_host_url(),
            command_template: None,
        }
    }
}

impl Preferences {
    /// Load preferences from `.handoff/handoff.toml`, writing a default
    /// file on first run. Missing keys take their defaults; a `read_limit`
    /// outside `1..=500` is rejected rather than silently clamped.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FILENAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Self::write_default(&path);
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };

        let prefs: Preferences =
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
        prefs
            .validate()
            .with_context(|| format!("invalid {}", path.display()))?;
        Ok(prefs)
    }

    fn write_default(path: &Path) -> Result<Self> {
        let prefs = Preferences::default();
        let toml_str =
            toml::to_string_pretty(&prefs).context("serializing default preferences")?;
        fs::write(path, toml_str)
            .with_context(|| format!("writing default {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote default preferences");
        Ok(prefs)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_READ_LIMIT).contains(&self.read_limit) {
            bail!(
                "read_limit must be between 1 and {MAX_READ_LIMIT}, got {}",
                self.read_limit
            );
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
