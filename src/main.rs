mod files;
mod handoff;
mod host;
mod preferences;
mod project;
mod router;
mod transcript;
mod types;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use host::{Host, HttpHost};
use project::Project;
use router::{ProcessedSessions, Router, spawn_router};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use types::HostEvent;

#[derive(Parser)]
#[command(name = "handoff", version, about = "Carry a session's working context into a new one")]
struct Cli {
    /// Project directory (defaults to the current directory).
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    /// Host HTTP server, overriding `host_url` in `.handoff/handoff.toml`.
    #[arg(long, global = true, env = "HANDOFF_HOST_URL")]
    host_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read host events as JSON lines on stdin and inject handoff files.
    Serve,
    /// Print a session's history as a compact transcript.
    ReadSession {
        session_id: String,
        /// Most recent messages to show (max 500).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Open a new session with PROMPT as its draft.
    Prepare { prompt: String },
    /// Print the `/handoff` command body for GOAL.
    Command {
        #[arg(trailing_var_arg = true)]
        goal: Vec<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("HANDOFF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn serve(project: &Project, host: Arc<dyn Host>) -> Result<()> {
    let handle = spawn_router(
        Router::new(ProcessedSessions::new()),
        host,
        project.root().to_path_buf(),
    );

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = stdin
            .read_until(b'\n', &mut buf)
            .await
            .context("reading stdin")?;
        if read == 0 {
            break;
        }
        line_no += 1;
        if buf.trim_ascii().is_empty() {
            continue;
        }
        // Invalid UTF-8 is rejected here along with any other bad JSON.
        let event: HostEvent = match serde_json::from_slice(&buf) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(line = line_no, "skipping malformed event: {e}");
                continue;
            }
        };
        match event {
            HostEvent::ChatMessage(e) => handle.chat_message(e).await?,
            HostEvent::SessionDeleted(e) => handle.session_deleted(e.properties.info.id).await?,
            HostEvent::Other => {}
        }
    }

    let router = handle.shutdown().await?;
    tracing::debug!(processed = router.processed().len(), "event stream closed");
    Ok(())
}

async fn run(cli: Cli) -> Result<Option<String>> {
    let cwd = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("reading current directory")?,
    };
    let project = Project::open(&cwd)?;
    let host_url = cli
        .host_url
        .unwrap_or_else(|| project.prefs.host_url.clone());
    let host = Arc::new(HttpHost::new(host_url));

    match cli.command {
        Commands::Serve => {
            serve(&project, host).await?;
            Ok(None)
        }
        Commands::ReadSession { session_id, limit } => {
            let limit = transcript::clamp_read_limit(limit, project.prefs.read_limit);
            Ok(Some(
                transcript::read_session(host.as_ref(), &session_id, limit).await,
            ))
        }
        Commands::Prepare { prompt } => {
            let confirmation =
                handoff::prepare_handoff(host.as_ref(), &prompt, project.prefs.settle_delay())
                    .await
                    .context("preparing handoff session")?;
            Ok(Some(confirmation))
        }
        Commands::Command { goal } => Ok(Some(project.handoff_command(&goal.join(" "))?)),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    match run(cli).await {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(err) => {
            eprintln!("handoff: {err:#}");
            process::exit(2);
        }
    }
}
