//! Subject normalization — reply/forward markers stripped to produce the
//! canonical conversation key.

/// Reply/forward prefixes recognized at the start of a subject.
/// Matching is case-sensitive against this fixed set.
const REPLY_PREFIXES: &[&str] = &["Re:", "Fwd:", "RE:", "FW:", "re:", "fwd:"];

/// Strip at most one reply/forward prefix and surrounding whitespace.
///
/// Deliberately single-strip: `"Re: Re: X"` normalizes to `"Re: X"`, so
/// doubly-nested replies form their own conversation. Looping over the
/// prefix list would merge keys the operator may want separate.
pub fn normalize_subject(subject: &str) -> String {
    let trimmed = subject.trim();
    for prefix in REPLY_PREFIXES {
        if let Some(rest) = trimmed.strip_prefix(prefix) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Subject line for a generated draft: `"Re: "` plus the canonical
/// subject, so every draft carries exactly one reply marker even when
/// the original subject already had one.
pub fn reply_subject(original_subject: &str) -> String {
    format!("Re: {}", normalize_subject(original_subject))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
