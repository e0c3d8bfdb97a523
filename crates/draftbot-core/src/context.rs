//! Context loader — background text handed verbatim to the reply generator.
//!
//! Reads every `.txt` and `.md` file from the configured resources
//! directory and concatenates them into one string, each file preceded by
//! a `--- File: <name> ---` header. A missing directory yields an empty
//! string; an unreadable file is logged and skipped.

use std::path::Path;
use tracing::warn;

/// Load all context resources from `dir` as a single block of text.
pub fn load_context(dir: &Path) -> String {
    if !dir.is_dir() {
        return String::new();
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("Failed to read resources dir {}: {}", dir.display(), e);
            return String::new();
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("md")
            )
        })
        .collect();
    // Deterministic order regardless of directory iteration order.
    paths.sort();

    let mut context = String::new();
    for path in paths {
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                context.push_str(&format!("\n--- File: {} ---\n{}\n", name, content));
            }
            Err(e) => {
                warn!("Error reading resource {}: {}", path.display(), e);
            }
        }
    }

    context
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
