//! `draftbot init` — write a default configuration file.

use anyhow::Result;
use colored::Colorize;

use draftbot_core::config::{get_config_path, load_config, save_config};
use draftbot_core::utils::expand_home;

/// Run the init command.
pub fn run() -> Result<()> {
    println!();
    println!("{}", "📬 Draftbot — Setup".cyan().bold());
    println!();

    let config_path = get_config_path();

    if config_path.exists() {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        let config = load_config(None); // defaults
        save_config(&config, Some(&config_path))?;
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    }

    // Resources directory for background context files.
    let config = load_config(None);
    let resources = expand_home(&config.triage.resources_dir);
    if !resources.exists() {
        std::fs::create_dir_all(&resources)?;
        println!(
            "  {} created resources dir at {}",
            "✓".green(),
            resources.display()
        );
    }

    println!();
    println!(
        "{}",
        "Fill in imap.host, imap.username, and a password or access token, \
         then run `draftbot run`."
            .dimmed()
    );
    Ok(())
}
