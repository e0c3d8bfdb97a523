//! Test doubles shared by the history and orchestrator tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use draftbot_ai::{ReplyGenerator, ReplyRequest};
use draftbot_core::types::{Conversation, Decision, Message};
use draftbot_mail::MailStore;

use crate::orchestrator::{Notice, OperatorConsole};
use crate::subject::normalize_subject;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn msg(sender: &str, subject: &str, secs: i64) -> Message {
    Message::new(sender, subject, format!("body of {subject}"), ts(secs))
}

pub fn conv(sender: &str, subject: &str, secs: i64) -> Conversation {
    Conversation {
        canonical_subject: normalize_subject(subject),
        representative: msg(sender, subject, secs),
    }
}

// ─────────────────────────────────────────────
// FakeStore
// ─────────────────────────────────────────────

/// In-memory `MailStore` recording every side effect.
#[derive(Default)]
pub struct FakeStore {
    pub unread: Vec<Message>,
    pub history: Vec<Message>,
    pub connect_fails: bool,
    pub unread_fails: bool,
    pub history_fails: bool,
    pub draft_fails: bool,
    pub drafts: Mutex<Vec<(String, String, String)>>,
    pub history_calls: AtomicUsize,
    pub disconnects: AtomicUsize,
}

#[async_trait]
impl MailStore for FakeStore {
    async fn connect(&self) -> anyhow::Result<()> {
        if self.connect_fails {
            anyhow::bail!("connect refused");
        }
        Ok(())
    }

    async fn disconnect(&self) {
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    async fn fetch_unread(&self, _sender_filter: Option<&str>) -> anyhow::Result<Vec<Message>> {
        if self.unread_fails {
            anyhow::bail!("unread fetch failed");
        }
        Ok(self.unread.clone())
    }

    async fn fetch_history(&self, _sender: &str, _limit: usize) -> anyhow::Result<Vec<Message>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.history_fails {
            anyhow::bail!("history fetch failed");
        }
        Ok(self.history.clone())
    }

    async fn create_draft(&self, recipient: &str, subject: &str, body: &str) -> bool {
        if self.draft_fails {
            return false;
        }
        self.drafts.lock().unwrap().push((
            recipient.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        true
    }
}

// ─────────────────────────────────────────────
// FakeGenerator
// ─────────────────────────────────────────────

/// Generator double with a fixed reply, recording call shape.
pub struct FakeGenerator {
    reply: Option<String>,
    pub calls: AtomicUsize,
    pub last_history_len: AtomicUsize,
}

impl FakeGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: AtomicUsize::new(0),
            last_history_len: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
            last_history_len: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ReplyGenerator for FakeGenerator {
    async fn generate(&self, request: &ReplyRequest<'_>) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_history_len
            .store(request.history.len(), Ordering::SeqCst);
        self.reply.clone()
    }

    fn display_name(&self) -> &str {
        "fake"
    }
}

// ─────────────────────────────────────────────
// ScriptedConsole
// ─────────────────────────────────────────────

/// Console double: scripted decisions in, recorded events out.
pub struct ScriptedConsole {
    decisions: VecDeque<Decision>,
    pub summaries: Vec<(usize, usize)>,
    pub presented: Vec<String>,
    pub notices: Vec<Notice>,
    pub done_count: usize,
}

impl ScriptedConsole {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: decisions.into(),
            summaries: Vec::new(),
            presented: Vec::new(),
            notices: Vec::new(),
            done_count: 0,
        }
    }
}

impl OperatorConsole for ScriptedConsole {
    fn summary(&mut self, unread: usize, conversations: usize) {
        self.summaries.push((unread, conversations));
    }

    fn present(&mut self, _index: usize, _total: usize, conversation: &Conversation) {
        self.presented.push(conversation.canonical_subject.clone());
    }

    fn decide(&mut self) -> Decision {
        self.decisions.pop_front().unwrap_or(Decision::Skip)
    }

    fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn done(&mut self) {
        self.done_count += 1;
    }
}
