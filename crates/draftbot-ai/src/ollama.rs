//! Ollama backend — non-streaming `/api/chat` over HTTP.
//!
//! Any failure (transport, HTTP status, body shape) is logged and
//! surfaced as `None`; the triage loop decides what to tell the operator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::prompt::build_prompt;
use crate::traits::{ReplyGenerator, ReplyRequest};

/// HTTP client timeout. Local models can be slow to first token.
const REQUEST_TIMEOUT_SECS: u64 = 300;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

// ─────────────────────────────────────────────
// OllamaGenerator
// ─────────────────────────────────────────────

/// Reply generator backed by a local Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Build the full chat URL.
    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ReplyGenerator for OllamaGenerator {
    async fn generate(&self, request: &ReplyRequest<'_>) -> Option<String> {
        let prompt = build_prompt(request);

        debug!(
            model = %self.model,
            sender = %request.sender,
            history = request.history.len(),
            "calling Ollama"
        );

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            stream: false,
        };

        let response = match self.client.post(self.chat_url()).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "Ollama request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(status = %status, body = %error_text, "Ollama API error");
            return None;
        }

        match response.json::<ChatResponse>().await {
            Ok(chat) => {
                debug!(chars = chat.message.content.len(), "Ollama reply received");
                Some(chat.message.content)
            }
            Err(e) => {
                error!(error = %e, "failed to parse Ollama response");
                None
            }
        }
    }

    fn display_name(&self) -> &str {
        "Ollama"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
