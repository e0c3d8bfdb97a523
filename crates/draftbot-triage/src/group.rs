//! Conversation grouping — collapse unread messages into one
//! representative per canonical subject, newest conversation first.

use std::collections::HashMap;

use draftbot_core::types::{Conversation, Message};

use crate::subject::normalize_subject;

/// Group messages by canonical subject.
///
/// The representative for each key is the member with the strictly
/// greatest timestamp; on equal timestamps the earlier input wins. Output
/// is ordered by representative timestamp descending, ties preserved in
/// first-seen key order (stable sort).
pub fn group_conversations(messages: Vec<Message>) -> Vec<Conversation> {
    let mut conversations: Vec<Conversation> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for message in messages {
        let key = normalize_subject(&message.subject);
        match index.get(&key) {
            Some(&i) => {
                if message.timestamp > conversations[i].representative.timestamp {
                    conversations[i].representative = message;
                }
            }
            None => {
                index.insert(key.clone(), conversations.len());
                conversations.push(Conversation {
                    canonical_subject: key,
                    representative: message,
                });
            }
        }
    }

    conversations.sort_by(|a, b| b.representative.timestamp.cmp(&a.representative.timestamp));
    conversations
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
