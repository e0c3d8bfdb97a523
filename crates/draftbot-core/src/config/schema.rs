//! Configuration schema — typed settings for mailbox, model, and triage.
//!
//! Hierarchy: `Config` → `ImapConfig`, `OllamaConfig`, `TriageConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! `#[serde(rename_all = "camelCase")]` handles the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.draftbot/config.json` + env vars.
///
/// Constructed once at startup and passed by reference into each component;
/// read-only for the duration of the run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub imap: ImapConfig,
    pub ollama: OllamaConfig,
    pub triage: TriageConfig,
}

// ─────────────────────────────────────────────
// IMAP
// ─────────────────────────────────────────────

/// Mailbox connection settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImapConfig {
    /// IMAP server hostname.
    pub host: String,
    /// IMAP port (0 = default for the TLS mode).
    pub port: u16,
    /// Account username (usually the email address).
    pub username: String,
    /// Account password, for plain LOGIN.
    pub password: String,
    /// Pre-acquired OAuth2 access token. When set, login uses
    /// AUTHENTICATE XOAUTH2 instead of LOGIN; acquiring the token is
    /// outside this program's scope.
    pub access_token: String,
    /// Use implicit TLS (IMAPS).
    pub use_ssl: bool,
    /// Mailbox to triage.
    pub mailbox: String,
    /// Folder drafts are appended to.
    pub drafts_folder: String,
}

impl Default for ImapConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 993,
            username: String::new(),
            password: String::new(),
            access_token: String::new(),
            use_ssl: true,
            mailbox: "INBOX".to_string(),
            drafts_folder: "Drafts".to_string(),
        }
    }
}

impl ImapConfig {
    /// Whether enough fields are present to attempt a connection.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty()
            && !self.username.is_empty()
            && (!self.password.is_empty() || !self.access_token.is_empty())
    }
}

// ─────────────────────────────────────────────
// Ollama
// ─────────────────────────────────────────────

/// Local LLM backend settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model identifier (e.g. `"llama3.1"`).
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Triage
// ─────────────────────────────────────────────

/// Settings for the triage run itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TriageConfig {
    /// Restrict the unread fetch to this sender; also the only sender
    /// for which conversation history is fetched. Empty = all senders,
    /// no history.
    pub target_sender: String,
    /// Maximum prior messages fetched per conversation.
    pub history_limit: usize,
    /// Characters of body shown in the per-conversation preview.
    pub preview_chars: usize,
    /// Maximum characters kept of each fetched body.
    pub max_body_chars: usize,
    /// Directory of `.txt`/`.md` background files fed to the generator.
    pub resources_dir: String,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            target_sender: String::new(),
            history_limit: 5,
            preview_chars: 100,
            max_body_chars: 12000,
            resources_dir: "resources".to_string(),
        }
    }
}

impl TriageConfig {
    /// The sender filter as an `Option` (empty string = no filter).
    pub fn sender_filter(&self) -> Option<&str> {
        if self.target_sender.is_empty() {
            None
        } else {
            Some(&self.target_sender)
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.imap.port, 993);
        assert!(cfg.imap.use_ssl);
        assert_eq!(cfg.imap.mailbox, "INBOX");
        assert_eq!(cfg.imap.drafts_folder, "Drafts");
        assert_eq!(cfg.ollama.base_url, "http://localhost:11434");
        assert_eq!(cfg.triage.history_limit, 5);
        assert_eq!(cfg.triage.preview_chars, 100);
    }

    #[test]
    fn imap_not_configured_when_empty() {
        assert!(!ImapConfig::default().is_configured());
    }

    #[test]
    fn imap_configured_with_password() {
        let cfg = ImapConfig {
            host: "imap.example.com".into(),
            username: "user@example.com".into(),
            password: "secret".into(),
            ..Default::default()
        };
        assert!(cfg.is_configured());
    }

    #[test]
    fn imap_configured_with_token_only() {
        let cfg = ImapConfig {
            host: "outlook.office365.com".into(),
            username: "user@example.com".into(),
            access_token: "ya29.token".into(),
            ..Default::default()
        };
        assert!(cfg.is_configured());
    }

    #[test]
    fn sender_filter_empty_is_none() {
        assert_eq!(TriageConfig::default().sender_filter(), None);
    }

    #[test]
    fn sender_filter_set() {
        let cfg = TriageConfig {
            target_sender: "boss@example.com".into(),
            ..Default::default()
        };
        assert_eq!(cfg.sender_filter(), Some("boss@example.com"));
    }

    #[test]
    fn json_uses_camel_case() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["imap"].get("draftsFolder").is_some());
        assert!(json["imap"].get("drafts_folder").is_none());
        assert!(json["triage"].get("targetSender").is_some());
        assert!(json["ollama"].get("baseUrl").is_some());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"imap": {"host": "imap.example.com"}}"#).unwrap();
        assert_eq!(cfg.imap.host, "imap.example.com");
        assert_eq!(cfg.imap.port, 993);
        assert_eq!(cfg.ollama.model, "llama3.1");
    }
}
