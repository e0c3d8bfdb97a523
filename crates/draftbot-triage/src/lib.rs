//! Draftbot triage — the conversation pipeline.
//!
//! Unread messages → one representative per canonical subject → an
//! interactive reply loop that saves drafts, never sends.

pub mod group;
pub mod history;
pub mod orchestrator;
pub mod subject;

#[cfg(test)]
pub(crate) mod testutil;

pub use group::group_conversations;
pub use history::resolve_history;
pub use orchestrator::{Notice, OperatorConsole, TriageRun};
pub use subject::{normalize_subject, reply_subject};
