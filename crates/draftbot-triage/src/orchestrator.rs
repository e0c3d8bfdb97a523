//! The reply orchestrator — drives the interactive loop over
//! conversations.
//!
//! Per conversation: present → decision → on `generate`, resolve history,
//! call the generator, interpret the outcome, and save a draft or report
//! why not. `stop` ends the run; every other failure is contained to its
//! conversation. The mailbox is disconnected exactly once on every exit
//! path, fatal errors included.

use anyhow::Context;
use tracing::{info, warn};

use draftbot_ai::{ReplyGenerator, ReplyRequest};
use draftbot_core::config::schema::TriageConfig;
use draftbot_core::types::{Conversation, Decision, ReplyOutcome};
use draftbot_mail::MailStore;

use crate::group::group_conversations;
use crate::history::resolve_history;
use crate::subject::reply_subject;

// ─────────────────────────────────────────────
// Operator surface
// ─────────────────────────────────────────────

/// Per-conversation outcome reported to the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// Nothing unread; the run ends before the loop.
    NoUnread,
    /// A draft was saved for this conversation.
    DraftSaved,
    /// The draft could not be saved.
    DraftFailed,
    /// The generator produced no output.
    GenerationFailed,
    /// The generator answered with the IGNORE sentinel.
    GeneratorIgnored,
}

/// The operator-facing surface: presentation plus the blocking decision
/// gate. Pluggable so the loop runs against a terminal, a script, or a
/// test double.
pub trait OperatorConsole {
    /// Announce totals before the loop: unread messages and distinct
    /// conversations.
    fn summary(&mut self, unread: usize, conversations: usize);

    /// Surface one conversation's representative (1-based index).
    fn present(&mut self, index: usize, total: usize, conversation: &Conversation);

    /// Block for the operator's decision for the conversation just
    /// presented.
    fn decide(&mut self) -> Decision;

    /// Report a per-conversation or run-level outcome.
    fn notice(&mut self, notice: Notice);

    /// The run is over (always called, regardless of how it ended).
    fn done(&mut self);
}

// ─────────────────────────────────────────────
// TriageRun
// ─────────────────────────────────────────────

/// One triage run over a mailbox: connect, dedup, loop, disconnect.
pub struct TriageRun<'a> {
    store: &'a dyn MailStore,
    generator: &'a dyn ReplyGenerator,
    config: &'a TriageConfig,
    /// Background text handed verbatim to the generator.
    context: &'a str,
}

impl<'a> TriageRun<'a> {
    pub fn new(
        store: &'a dyn MailStore,
        generator: &'a dyn ReplyGenerator,
        config: &'a TriageConfig,
        context: &'a str,
    ) -> Self {
        Self {
            store,
            generator,
            config,
            context,
        }
    }

    /// Execute the run. Connection cleanup and the done signal happen on
    /// every exit path, including fatal errors.
    pub async fn run(&self, console: &mut dyn OperatorConsole) -> anyhow::Result<()> {
        let result = self.run_loop(console).await;
        self.store.disconnect().await;
        console.done();
        result
    }

    /// The fallible phase: connect, fetch, dedup, interactive loop.
    async fn run_loop(&self, console: &mut dyn OperatorConsole) -> anyhow::Result<()> {
        self.store
            .connect()
            .await
            .context("failed to connect to mailbox")?;

        let unread = self
            .store
            .fetch_unread(self.config.sender_filter())
            .await
            .context("failed to fetch unread mail")?;

        if unread.is_empty() {
            console.notice(Notice::NoUnread);
            return Ok(());
        }

        let unread_count = unread.len();
        let conversations = group_conversations(unread);
        console.summary(unread_count, conversations.len());

        let total = conversations.len();
        for (i, conversation) in conversations.iter().enumerate() {
            console.present(i + 1, total, conversation);

            match console.decide() {
                Decision::Stop => {
                    info!(remaining = total - i - 1, "operator stopped the run");
                    break;
                }
                Decision::Skip => continue,
                Decision::Generate => self.generate_for(conversation, console).await,
            }
        }

        Ok(())
    }

    /// Generate and (maybe) draft a reply for one conversation. All
    /// failures are reported and contained here.
    async fn generate_for(&self, conversation: &Conversation, console: &mut dyn OperatorConsole) {
        let representative = &conversation.representative;

        let history = resolve_history(
            self.store,
            conversation,
            self.config.sender_filter(),
            self.config.history_limit,
        )
        .await;

        let request = ReplyRequest {
            sender: &representative.sender,
            subject: &representative.subject,
            body: &representative.body,
            history: &history.messages,
            context: self.context,
        };

        let raw = self.generator.generate(&request).await;
        match ReplyOutcome::from_generator(raw) {
            ReplyOutcome::Failed => {
                warn!(subject = %conversation.canonical_subject, "reply generation failed");
                console.notice(Notice::GenerationFailed);
            }
            ReplyOutcome::Ignored => {
                info!(subject = %conversation.canonical_subject, "generator chose to ignore");
                console.notice(Notice::GeneratorIgnored);
            }
            ReplyOutcome::Text(body) => {
                let subject = reply_subject(&representative.subject);
                let saved = self
                    .store
                    .create_draft(&representative.sender, &subject, &body)
                    .await;
                console.notice(if saved {
                    Notice::DraftSaved
                } else {
                    Notice::DraftFailed
                });
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
