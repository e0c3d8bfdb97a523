//! Prompt construction for reply drafting.
//!
//! One user-role prompt carrying the background context, the chronological
//! conversation history, the new email, and the drafting instructions
//! (including the IGNORE rule for spam/irrelevant mail).

use crate::traits::ReplyRequest;

/// Characters of each history body included in the prompt.
const HISTORY_BODY_CHARS: usize = 500;

/// Render the chronological history block.
fn history_block(request: &ReplyRequest<'_>) -> String {
    if request.history.is_empty() {
        return "No previous history.".to_string();
    }
    request
        .history
        .iter()
        .map(|msg| {
            let body: String = msg.body.chars().take(HISTORY_BODY_CHARS).collect();
            format!(
                "From: {}\nDate: {}\nSubject: {}\nBody: {}...\n---",
                msg.sender,
                msg.timestamp.to_rfc2822(),
                msg.subject,
                body
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full drafting prompt for one conversation.
pub fn build_prompt(request: &ReplyRequest<'_>) -> String {
    format!(
        "You are a helpful email assistant. Please draft a professional and courteous reply to the following email.\n\
        \n\
        --- CONTEXT & RESOURCES ---\n\
        The user has provided the following background information to help you answer accurately:\n\
        {context}\n\
        ---------------------------\n\
        \n\
        --- PAST CONVERSATION HISTORY (Chronological) ---\n\
        {history}\n\
        -----------------------------------------------\n\
        \n\
        --- NEW INCOMING EMAIL ---\n\
        SENDER: {sender}\n\
        SUBJECT: {subject}\n\
        \n\
        EMAIL BODY:\n\
        {body}\n\
        \n\
        INSTRUCTIONS:\n\
        - **IMPORTANT**: Reply ONLY to the \"NEW INCOMING EMAIL\" above. Do NOT reply to the \"PAST CONVERSATION HISTORY\".\n\
        - The conversation history is provided ONLY for context so you understand what was said before.\n\
        - Use the CONTEXT to provide accurate specific details if relevant.\n\
        - Keep the tone professional but friendly.\n\
        - Address the sender by name if possible.\n\
        - Do not include placeholders like [Your Name]; sign off simply with \"Best regards,\" followed by nothing else (the user will sign it).\n\
        - If the email is spam or irrelevant, reply with \"IGNORE\".",
        context = request.context,
        history = history_block(request),
        sender = request.sender,
        subject = request.subject,
        body = request.body,
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
