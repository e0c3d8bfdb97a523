//! Reply generator trait — the LLM seam.
//!
//! The pipeline treats the generator as an opaque text transform with
//! three outcome shapes: reply text, the literal `"IGNORE"` sentinel,
//! or an absent result on failure. Prompt construction and model
//! selection live behind this trait.

use async_trait::async_trait;
use draftbot_core::types::Message;

/// Everything a backend needs to draft one reply.
#[derive(Clone, Debug)]
pub struct ReplyRequest<'a> {
    /// Sender of the email being replied to.
    pub sender: &'a str,
    /// Its raw subject.
    pub subject: &'a str,
    /// Its plain-text body.
    pub body: &'a str,
    /// Prior messages from the same sender, chronological order.
    pub history: &'a [Message],
    /// Process-wide background text (may be empty).
    pub context: &'a str,
}

/// Trait all reply backends implement.
///
/// On any backend failure the implementation returns `None` and logs the
/// cause — errors are expressed in the return value, never propagated.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Produce reply text, the `"IGNORE"` sentinel, or `None` on failure.
    async fn generate(&self, request: &ReplyRequest<'_>) -> Option<String>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
