//! RFC 2822 parsing — raw fetched bytes into the core `Message` type.
//!
//! Prefers text/plain parts; falls back to HTML converted to text.
//! Attachments are skipped and bodies truncated to a configurable maximum.

use chrono::{DateTime, TimeZone, Utc};
use draftbot_core::types::Message;
use tracing::warn;

/// Extract the email address from a From header value.
///
/// Handles formats like:
/// - `user@example.com`
/// - `"User Name" <user@example.com>`
/// - `User Name <user@example.com>`
pub fn extract_sender_email(from_header: &str) -> String {
    // Look for <email> pattern
    if let Some(start) = from_header.rfind('<') {
        if let Some(end) = from_header.rfind('>') {
            if end > start {
                return from_header[start + 1..end].trim().to_lowercase();
            }
        }
    }
    // Fallback: use the whole thing
    from_header.trim().to_lowercase()
}

/// Convert minimal HTML to plain text.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();
    // <br> → newline
    text = regex::Regex::new(r"(?i)<br\s*/?>")
        .unwrap()
        .replace_all(&text, "\n")
        .to_string();
    // </p> → newline
    text = regex::Regex::new(r"(?i)</p>")
        .unwrap()
        .replace_all(&text, "\n")
        .to_string();
    // Strip all remaining tags
    text = regex::Regex::new(r"<[^>]+>")
        .unwrap()
        .replace_all(&text, "")
        .to_string();
    // Unescape common HTML entities
    text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    text.trim().to_string()
}

/// Parse raw RFC 2822 bytes into a `Message`.
///
/// Returns `None` if the bytes are not parseable as an email at all.
/// An unparseable Date header falls back to the Unix epoch (with a
/// warning) rather than dropping the message.
pub fn parse_message(raw: &[u8], max_body_chars: usize) -> Option<Message> {
    let parsed = mailparse::parse_mail(raw).ok()?;

    let get_header = |name: &str| -> String {
        parsed
            .headers
            .iter()
            .find(|h| h.get_key().eq_ignore_ascii_case(name))
            .map(|h| h.get_value())
            .unwrap_or_default()
    };

    let sender = extract_sender_email(&get_header("From"));
    let subject = get_header("Subject");
    let timestamp = parse_date(&get_header("Date"));
    let body = extract_body(&parsed, max_body_chars);

    Some(Message {
        sender,
        subject,
        body,
        timestamp,
    })
}

/// Parse an RFC 2822 Date header into a UTC timestamp.
fn parse_date(date_header: &str) -> DateTime<Utc> {
    match mailparse::dateparse(date_header) {
        Ok(epoch) => Utc.timestamp_opt(epoch, 0).single().unwrap_or_default(),
        Err(e) => {
            warn!(date = %date_header, error = %e, "unparseable Date header, using epoch");
            DateTime::<Utc>::default()
        }
    }
}

/// Extract text body from a parsed email (prefer text/plain, fallback HTML).
fn extract_body(mail: &mailparse::ParsedMail, max_chars: usize) -> String {
    if mail.subparts.is_empty() {
        // Single-part message
        let ct = mail.ctype.mimetype.to_lowercase();
        let body = mail.get_body().unwrap_or_default();
        let result = if ct.contains("text/html") {
            html_to_text(&body)
        } else {
            body
        };
        return truncate(&result, max_chars);
    }

    // Multipart: collect text/plain and text/html parts
    let mut plain_parts = Vec::new();
    let mut html_parts = Vec::new();
    collect_text_parts(mail, &mut plain_parts, &mut html_parts);

    let body = if !plain_parts.is_empty() {
        plain_parts.join("\n")
    } else if !html_parts.is_empty() {
        html_parts
            .iter()
            .map(|h| html_to_text(h))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        String::new()
    };

    truncate(&body, max_chars)
}

/// Recursively collect text parts from multipart emails.
fn collect_text_parts(
    mail: &mailparse::ParsedMail,
    plain: &mut Vec<String>,
    html: &mut Vec<String>,
) {
    for part in &mail.subparts {
        // Skip attachments
        let disposition = part.get_content_disposition();
        if disposition.disposition == mailparse::DispositionType::Attachment {
            continue;
        }

        if !part.subparts.is_empty() {
            collect_text_parts(part, plain, html);
        } else {
            let ct = part.ctype.mimetype.to_lowercase();
            if let Ok(body) = part.get_body() {
                if ct.contains("text/plain") {
                    plain.push(body);
                } else if ct.contains("text/html") {
                    html.push(body);
                }
            }
        }
    }
}

/// Truncate a string to max characters, keeping char boundaries intact.
fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
