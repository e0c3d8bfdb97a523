//! Draftbot CLI — entry point.
//!
//! # Commands
//!
//! - `draftbot run` — interactive triage over unread mail
//! - `draftbot init` — write a default config file
//! - `draftbot status` — show configuration at a glance

mod console;
mod init_cmd;
mod status;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use draftbot_ai::{OllamaGenerator, ReplyGenerator};
use draftbot_core::config::load_config;
use draftbot_core::{context, utils};
use draftbot_mail::ImapStore;
use draftbot_triage::TriageRun;

use crate::console::TerminalConsole;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 📬 Draftbot — triage unread mail into AI-drafted replies
#[derive(Parser)]
#[command(name = "draftbot", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive triage loop over unread mail
    Run {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Write a default configuration file
    Init,

    /// Show configuration at a glance
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { logs } => {
            init_logging(logs);
            run_triage().await
        }
        Commands::Init => init_cmd::run(),
        Commands::Status => status::run(),
    }
}

// ─────────────────────────────────────────────
// Run command
// ─────────────────────────────────────────────

async fn run_triage() -> Result<()> {
    let config = load_config(None);

    if !config.imap.is_configured() {
        bail!(
            "mailbox not configured — run `draftbot init` and fill in \
             imap.host, imap.username, and a password or access token"
        );
    }

    // Background resources for the generator (empty string if none).
    let resources = utils::expand_home(&config.triage.resources_dir);
    let background = context::load_context(&resources);
    if background.is_empty() {
        info!(dir = %resources.display(), "no context resources found");
    } else {
        info!(chars = background.len(), "loaded context resources");
    }

    let store = ImapStore::new(config.imap.clone(), config.triage.max_body_chars);
    let generator =
        OllamaGenerator::new(config.ollama.base_url.as_str(), config.ollama.model.as_str());
    let mut console = TerminalConsole::new(config.triage.preview_chars)?;

    console.banner(&config.imap.username, generator.display_name());

    TriageRun::new(&store, &generator, &config.triage, &background)
        .run(&mut console)
        .await
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("draftbot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
