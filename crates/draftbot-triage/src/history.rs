//! History resolution — prior messages from the representative's sender,
//! attached to a conversation at the moment the operator asks for a reply.
//!
//! Best-effort enrichment: a fetch failure yields an empty window and a
//! warning, never an error.

use tracing::{debug, warn};

use draftbot_core::types::{Conversation, HistoryWindow, Message};
use draftbot_mail::MailStore;

/// Resolve the history window for one conversation.
///
/// History is only fetched when the representative's sender is the
/// configured target sender; for anyone else the round trip is skipped
/// and the window is empty. The fetched result (newest-first per the
/// store contract) is filtered to messages strictly older than the
/// representative and re-ordered chronologically.
pub async fn resolve_history(
    store: &dyn MailStore,
    conversation: &Conversation,
    target_sender: Option<&str>,
    limit: usize,
) -> HistoryWindow {
    let representative = &conversation.representative;

    if target_sender != Some(representative.sender.as_str()) {
        debug!(sender = %representative.sender, "history skipped for non-target sender");
        return HistoryWindow::empty();
    }

    let fetched = match store.fetch_history(&representative.sender, limit).await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(sender = %representative.sender, error = %e, "history fetch failed");
            return HistoryWindow::empty();
        }
    };

    // Drop anything not strictly older than the representative (the store
    // may re-return the triggering message itself), then go chronological.
    let mut messages: Vec<Message> = fetched
        .into_iter()
        .filter(|m| m.timestamp < representative.timestamp)
        .collect();
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    HistoryWindow { messages }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{conv, msg, FakeStore};
    use std::sync::atomic::Ordering;

    const SENDER: &str = "boss@example.com";

    #[tokio::test]
    async fn skips_fetch_for_non_target_sender() {
        let store = FakeStore {
            history: vec![msg(SENDER, "Old", 1)],
            ..Default::default()
        };
        let conversation = conv(SENDER, "Budget", 6);

        let window =
            resolve_history(&store, &conversation, Some("other@example.com"), 5).await;
        assert!(window.is_empty());
        assert_eq!(store.history_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn skips_fetch_when_no_target_configured() {
        let store = FakeStore::default();
        let window = resolve_history(&store, &conv(SENDER, "Budget", 6), None, 5).await;
        assert!(window.is_empty());
        assert_eq!(store.history_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn filters_and_reorders_chronologically() {
        // Raw fetched history [t=5, t=3, t=7] against a representative at
        // t=6 resolves to [t=3, t=5]: t=7 dropped, ascending order.
        let store = FakeStore {
            history: vec![
                msg(SENDER, "Budget", 5),
                msg(SENDER, "Budget", 3),
                msg(SENDER, "Budget", 7),
            ],
            ..Default::default()
        };
        let conversation = conv(SENDER, "Budget", 6);

        let window = resolve_history(&store, &conversation, Some(SENDER), 5).await;
        let stamps: Vec<i64> = window.messages.iter().map(|m| m.timestamp.timestamp()).collect();
        assert_eq!(stamps, vec![3, 5]);
        assert_eq!(store.history_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn equal_timestamp_is_dropped() {
        let store = FakeStore {
            history: vec![msg(SENDER, "Budget", 6)],
            ..Default::default()
        };
        let window = resolve_history(&store, &conv(SENDER, "Budget", 6), Some(SENDER), 5).await;
        assert!(window.is_empty());
    }

    #[tokio::test]
    async fn fetch_failure_yields_empty_window() {
        let store = FakeStore {
            history_fails: true,
            ..Default::default()
        };
        let window = resolve_history(&store, &conv(SENDER, "Budget", 6), Some(SENDER), 5).await;
        assert!(window.is_empty());
    }
}
