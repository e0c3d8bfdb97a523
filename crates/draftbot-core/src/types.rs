//! Core types for Draftbot — the data that flows through the triage pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Message
// ─────────────────────────────────────────────

/// A single email message, as fetched from the mailbox.
///
/// Immutable once fetched. Identity for dedup/history purposes is
/// `(sender, subject, timestamp)` — no mailbox-level ID is carried.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Sender email address (lowercase).
    pub sender: String,
    /// Raw subject line, as received.
    pub subject: String,
    /// Plain-text body (HTML already converted, possibly truncated).
    pub body: String,
    /// Received timestamp from the Date header.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            subject: subject.into(),
            body: body.into(),
            timestamp,
        }
    }
}

// ─────────────────────────────────────────────
// Conversation
// ─────────────────────────────────────────────

/// The deduplicated unit of review: one canonical subject, one
/// representative message (the newest in its group).
///
/// Constructed once per run by the conversation grouper; never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversation {
    /// Subject with reply/forward markers stripped.
    pub canonical_subject: String,
    /// The newest message sharing this canonical subject.
    pub representative: Message,
}

// ─────────────────────────────────────────────
// HistoryWindow
// ─────────────────────────────────────────────

/// Prior messages from the representative's sender, strictly ascending by
/// timestamp, all older than the representative.
///
/// Built lazily when the operator asks for a reply — fetching it costs a
/// mailbox round trip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryWindow {
    pub messages: Vec<Message>,
}

impl HistoryWindow {
    /// An empty window (no history available or not requested).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

// ─────────────────────────────────────────────
// Decision
// ─────────────────────────────────────────────

/// The operator's per-conversation choice. Drives control flow only;
/// never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Generate a draft reply for this conversation.
    Generate,
    /// Move on without any side effect.
    Skip,
    /// Terminate the whole run; remaining conversations are not presented.
    Stop,
}

// ─────────────────────────────────────────────
// ReplyOutcome
// ─────────────────────────────────────────────

/// Result of invoking the reply generator for one conversation.
#[derive(Clone, Debug, PartialEq)]
pub enum ReplyOutcome {
    /// The generator signaled (via the IGNORE sentinel) that no reply
    /// should be drafted.
    Ignored,
    /// A usable reply body.
    Text(String),
    /// The generator could not produce output.
    Failed,
}

/// Reserved generator output meaning "do not draft a reply".
pub const IGNORE_SENTINEL: &str = "IGNORE";

impl ReplyOutcome {
    /// Interpret a raw generator result: absent or blank → `Failed`, the
    /// trimmed sentinel → `Ignored`, anything else → `Text`.
    pub fn from_generator(raw: Option<String>) -> Self {
        match raw {
            None => ReplyOutcome::Failed,
            Some(text) if text.trim().is_empty() => ReplyOutcome::Failed,
            Some(text) if text.trim() == IGNORE_SENTINEL => ReplyOutcome::Ignored,
            Some(text) => ReplyOutcome::Text(text),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
