use crate::handoff::{CommandTemplate, HANDOFF_COMMAND, render_command};
use crate::preferences::Preferences;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_DIR: &str = ".handoff";

pub struct Project {
    root: PathBuf,
    dir: PathBuf,
    pub prefs: Preferences,
}

/// Work tree of the git repo containing `cwd`, if any.
fn discover_workdir(cwd: &Path) -> Option<PathBuf> {
    let repo = git2::Repository::discover(cwd).ok()?;
    repo.workdir().map(Path::to_path_buf)
}

impl Project {
    /// Find the project root for `cwd` (the enclosing git work tree, or
    /// `cwd` itself outside a repo), ensure `.handoff/` exists, and load
    /// preferences.
    pub fn open(cwd: &Path) -> Result<Self> {
        let cwd = fs::canonicalize(cwd)
            .with_context(|| format!("resolving project directory {}", cwd.display()))?;
        let root = match discover_workdir(&cwd) {
            Some(workdir) => workdir,
            None => {
                tracing::debug!(cwd = %cwd.display(), "not in a git repo, using cwd as project root");
                cwd
            }
        };
        let dir = root.join(DATA_DIR);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let prefs = Preferences::load(&dir)?;
        Ok(Self { root, dir, prefs })
    }

    /// Directory `@file` references are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the `/handoff` command template to a string.
    fn load_command_template(&self) -> Result<String> {
        match &self.prefs.command_template {
            None => Ok(HANDOFF_COMMAND.to_string()),
            Some(CommandTemplate::Inline(s)) => Ok(s.clone()),
            Some(CommandTemplate::File(filename)) => {
                let path = self.dir.join(filename);
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))
            }
        }
    }

    /// The `/handoff` command body for `goal`.
    pub fn handoff_command(&self, goal: &str) -> Result<String> {
        let template = self.load_command_template()?;
        render_command(&template, goal)
    }
}
