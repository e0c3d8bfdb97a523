//! `MailStore` — the mailbox seam the triage pipeline drives.
//!
//! One implementation talks IMAP (`ImapStore`); tests elsewhere substitute
//! doubles. The store owns the single mailbox connection for the run.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use draftbot_core::config::schema::ImapConfig;
use draftbot_core::types::Message;

use crate::imap::ImapClient;
use crate::parse;

/// Mailbox operations the triage pipeline depends on.
#[async_trait]
pub trait MailStore: Send + Sync {
    /// Establish the mailbox session. Fatal if it fails.
    async fn connect(&self) -> anyhow::Result<()>;

    /// Close the mailbox session. Safe to call even if `connect` never
    /// succeeded; never fails.
    async fn disconnect(&self);

    /// Fetch unread messages, optionally restricted to one sender.
    /// No ordering is guaranteed.
    async fn fetch_unread(&self, sender_filter: Option<&str>) -> anyhow::Result<Vec<Message>>;

    /// Fetch up to `limit` most-recent messages from `sender`, newest-first.
    async fn fetch_history(&self, sender: &str, limit: usize) -> anyhow::Result<Vec<Message>>;

    /// Persist a draft. Returns success/failure; never raises into the
    /// caller.
    async fn create_draft(&self, recipient: &str, subject: &str, body: &str) -> bool;
}

// ─────────────────────────────────────────────
// ImapStore
// ─────────────────────────────────────────────

/// IMAP-backed `MailStore`. Holds the one connection for the run.
pub struct ImapStore {
    config: ImapConfig,
    max_body_chars: usize,
    session: Mutex<Option<ImapClient>>,
}

impl ImapStore {
    pub fn new(config: ImapConfig, max_body_chars: usize) -> Self {
        Self {
            config,
            max_body_chars,
            session: Mutex::new(None),
        }
    }

    /// Fetch and parse the messages for a set of sequence numbers.
    /// Unparseable messages are logged and dropped.
    async fn fetch_parsed(
        client: &mut ImapClient,
        seqnums: &[u32],
        max_body_chars: usize,
    ) -> Vec<Message> {
        let mut messages = Vec::with_capacity(seqnums.len());
        for &seqnum in seqnums {
            let raw = match client.fetch_body(seqnum).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(seqnum = seqnum, error = %e, "failed to fetch message");
                    continue;
                }
            };
            match parse::parse_message(&raw, max_body_chars) {
                Some(msg) => messages.push(msg),
                None => warn!(seqnum = seqnum, "failed to parse message"),
            }
        }
        messages
    }

    /// Build the raw draft bytes (RFC 2822) for an APPEND.
    fn build_draft(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<Vec<u8>> {
        let message = lettre::Message::builder()
            .from(
                self.config
                    .username
                    .parse()
                    .map_err(|e| anyhow::anyhow!("invalid from address: {}", e))?,
            )
            .to(recipient
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid to address: {}", e))?)
            .subject(subject)
            .body(body.to_string())
            .map_err(|e| anyhow::anyhow!("failed to build draft: {}", e))?;
        Ok(message.formatted())
    }
}

#[async_trait]
impl MailStore for ImapStore {
    async fn connect(&self) -> anyhow::Result<()> {
        let mut client =
            ImapClient::connect(&self.config.host, self.config.port, self.config.use_ssl).await?;

        // Prefer XOAUTH2 when a token is configured (the original account
        // type this was built for rejects plain LOGIN).
        if !self.config.access_token.is_empty() {
            client
                .authenticate_xoauth2(&self.config.username, &self.config.access_token)
                .await?;
        } else {
            client
                .login(&self.config.username, &self.config.password)
                .await?;
        }

        client.select(&self.config.mailbox).await?;

        info!(host = %self.config.host, user = %self.config.username, "mailbox connected");
        *self.session.lock().await = Some(client);
        Ok(())
    }

    async fn disconnect(&self) {
        if let Some(mut client) = self.session.lock().await.take() {
            if let Err(e) = client.logout().await {
                debug!(error = %e, "IMAP logout error (non-fatal)");
            }
            info!("mailbox disconnected");
        }
    }

    async fn fetch_unread(&self, sender_filter: Option<&str>) -> anyhow::Result<Vec<Message>> {
        let mut guard = self.session.lock().await;
        let client = guard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("not connected to mailbox"))?;

        let criteria = match sender_filter {
            Some(sender) => format!("UNSEEN FROM \"{}\"", sender),
            None => "UNSEEN".to_string(),
        };
        let seqnums = client.search(&criteria).await?;
        debug!(count = seqnums.len(), criteria = %criteria, "unread search");

        Ok(Self::fetch_parsed(client, &seqnums, self.max_body_chars).await)
    }

    async fn fetch_history(&self, sender: &str, limit: usize) -> anyhow::Result<Vec<Message>> {
        let mut guard = self.session.lock().await;
        let client = guard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("not connected to mailbox"))?;

        let seqnums = client.search(&format!("FROM \"{}\"", sender)).await?;
        // Sequence numbers ascend with arrival order; the last `limit`
        // are the most recent.
        let recent: Vec<u32> = seqnums
            .iter()
            .rev()
            .take(limit)
            .copied()
            .collect();

        let mut messages = Self::fetch_parsed(client, &recent, self.max_body_chars).await;
        // Contract: newest first.
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    async fn create_draft(&self, recipient: &str, subject: &str, body: &str) -> bool {
        let raw = match self.build_draft(recipient, subject, body) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "failed to build draft message");
                return false;
            }
        };

        let mut guard = self.session.lock().await;
        let client = match guard.as_mut() {
            Some(c) => c,
            None => {
                warn!("cannot save draft: not connected to mailbox");
                return false;
            }
        };

        match client
            .append(&self.config.drafts_folder, "\\Seen \\Draft", &raw)
            .await
        {
            Ok(()) => {
                info!(to = %recipient, subject = %subject, "draft saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to save draft");
                false
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> ImapStore {
        ImapStore::new(
            ImapConfig {
                host: "imap.example.com".into(),
                username: "me@example.com".into(),
                password: "secret".into(),
                ..Default::default()
            },
            12000,
        )
    }

    #[test]
    fn draft_bytes_contain_headers_and_body() {
        let store = make_store();
        let raw = store
            .build_draft("boss@example.com", "Re: Budget", "Sounds good.")
            .unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.contains("From: me@example.com"));
        assert!(text.contains("To: boss@example.com"));
        assert!(text.contains("Subject: Re: Budget"));
        assert!(text.contains("Sounds good."));
    }

    #[test]
    fn draft_rejects_invalid_recipient() {
        let store = make_store();
        assert!(store.build_draft("not an address", "Subject", "Body").is_err());
    }

    #[tokio::test]
    async fn disconnect_without_connect_is_safe() {
        let store = make_store();
        store.disconnect().await;
        store.disconnect().await;
    }

    #[tokio::test]
    async fn fetch_before_connect_fails() {
        let store = make_store();
        assert!(store.fetch_unread(None).await.is_err());
        assert!(store.fetch_history("a@example.com", 5).await.is_err());
    }

    #[tokio::test]
    async fn draft_before_connect_returns_false() {
        let store = make_store();
        assert!(!store.create_draft("boss@example.com", "Re: X", "text").await);
    }
}
