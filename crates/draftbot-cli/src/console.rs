//! Terminal console — the operator-facing side of the triage loop.
//!
//! Uses `rustyline` for the blocking decision prompt and `colored` for
//! output. Any input other than `y` or `q` counts as skip; Ctrl-C and
//! Ctrl-D behave like `q`.

use colored::Colorize;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};

use draftbot_core::types::{Conversation, Decision};
use draftbot_core::utils::truncate_string;
use draftbot_triage::{Notice, OperatorConsole};

/// Interactive console bound to the current terminal.
pub struct TerminalConsole {
    editor: Editor<(), DefaultHistory>,
    preview_chars: usize,
}

impl TerminalConsole {
    pub fn new(preview_chars: usize) -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            preview_chars,
        })
    }

    /// Print the version banner at the start of a run.
    pub fn banner(&self, user: &str, generator: &str) {
        let version = env!("CARGO_PKG_VERSION");
        println!();
        println!("{}  v{}", "📬 Draftbot".cyan().bold(), version.dimmed());
        println!(
            "{}",
            format!("Triaging unread mail for {user} · drafting with {generator}").dimmed()
        );
        println!();
    }
}

/// Map one line of operator input onto a decision.
/// `y` = generate, `q` = stop, anything else = skip.
fn map_decision(input: &str) -> Decision {
    match input.trim().to_lowercase().as_str() {
        "y" => Decision::Generate,
        "q" => Decision::Stop,
        _ => Decision::Skip,
    }
}

impl OperatorConsole for TerminalConsole {
    fn summary(&mut self, unread: usize, conversations: usize) {
        println!("Found {} unread emails.", unread);
        println!(
            "Filtered down to {} unique conversations (showing latest only).\n",
            conversations
        );
    }

    fn present(&mut self, index: usize, total: usize, conversation: &Conversation) {
        let rep = &conversation.representative;
        println!(
            "{} From: {} | Subject: {}",
            format!("[{}/{}]", index, total).bold(),
            rep.sender.cyan(),
            rep.subject
        );
        println!("    Date: {}", rep.timestamp.to_rfc2822().dimmed());
        println!(
            "    Preview: {}",
            truncate_string(&rep.body.replace('\n', " "), self.preview_chars).dimmed()
        );
    }

    fn decide(&mut self) -> Decision {
        match self.editor.readline("    Generate draft reply? (y/n/q): ") {
            Ok(line) => map_decision(&line),
            // Ctrl-C / Ctrl-D — treat like quit
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => Decision::Stop,
            Err(e) => {
                eprintln!("Input error: {e}");
                Decision::Stop
            }
        }
    }

    fn notice(&mut self, notice: Notice) {
        match notice {
            Notice::NoUnread => println!("No unread emails found."),
            Notice::DraftSaved => {
                println!("    {} Draft saved to the drafts folder.", "[Success]".green())
            }
            Notice::DraftFailed => {
                println!("    {} Failed to save draft.", "[Error]".red())
            }
            Notice::GenerationFailed => {
                println!("    {} AI failed to generate a reply.", "[Error]".red())
            }
            Notice::GeneratorIgnored => {
                println!("    {}", "AI suggested ignoring this email.".yellow())
            }
        }
        println!("{}", "-".repeat(40).dimmed());
    }

    fn done(&mut self) {
        println!("{}", "=== Done ===".bold());
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
