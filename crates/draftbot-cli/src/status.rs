//! `draftbot status` — show configuration at a glance.

use anyhow::Result;
use colored::Colorize;

use draftbot_core::config::{get_config_path, load_config};
use draftbot_core::utils::expand_home;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "📬 Draftbot Status".cyan().bold());
    println!();

    // Config file
    println!(
        "  {:<16} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    // Mailbox
    let mailbox = if config.imap.is_configured() {
        format!(
            "{} as {} ({})",
            config.imap.host,
            config.imap.username,
            if config.imap.access_token.is_empty() {
                "password"
            } else {
                "xoauth2"
            }
        )
    } else {
        "· not configured".dimmed().to_string()
    };
    println!("  {:<16} {}", "Mailbox:".bold(), mailbox);
    println!(
        "  {:<16} {} → drafts in {}",
        "Folders:".bold(),
        config.imap.mailbox,
        config.imap.drafts_folder
    );

    // Model
    println!(
        "  {:<16} {} @ {}",
        "Model:".bold(),
        config.ollama.model,
        config.ollama.base_url.clone().dimmed()
    );

    // Triage settings
    let target = if config.triage.target_sender.is_empty() {
        "· all senders (no history)".dimmed().to_string()
    } else {
        config.triage.target_sender.clone()
    };
    println!("  {:<16} {}", "Target sender:".bold(), target);
    println!(
        "  {:<16} {} messages",
        "History limit:".bold(),
        config.triage.history_limit
    );

    // Context resources
    let resources = expand_home(&config.triage.resources_dir);
    let background = draftbot_core::context::load_context(&resources);
    println!(
        "  {:<16} {} {}",
        "Resources:".bold(),
        resources.display(),
        if background.is_empty() {
            "(empty)".dimmed().to_string()
        } else {
            format!("{} chars loaded", background.len())
                .green()
                .to_string()
        }
    );

    println!();
    Ok(())
}
