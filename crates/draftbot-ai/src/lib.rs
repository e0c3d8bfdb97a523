//! Draftbot AI — the reply-generation seam and its Ollama backend.

pub mod ollama;
pub mod prompt;
pub mod traits;

pub use ollama::OllamaGenerator;
pub use traits::{ReplyGenerator, ReplyRequest};
