//! Config loader — reads `~/.draftbot/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.draftbot/config.json`
//! 3. Environment variables `DRAFTBOT_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::Config;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `DRAFTBOT_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `DRAFTBOT_IMAP__HOST` → `imap.host`
/// - `DRAFTBOT_IMAP__PORT` → `imap.port`
/// - `DRAFTBOT_IMAP__USERNAME` → `imap.username`
/// - `DRAFTBOT_IMAP__PASSWORD` → `imap.password`
/// - `DRAFTBOT_IMAP__ACCESS_TOKEN` → `imap.access_token`
/// - `DRAFTBOT_IMAP__MAILBOX` → `imap.mailbox`
/// - `DRAFTBOT_IMAP__DRAFTS_FOLDER` → `imap.drafts_folder`
/// - `DRAFTBOT_OLLAMA__BASE_URL` → `ollama.base_url`
/// - `DRAFTBOT_OLLAMA__MODEL` → `ollama.model`
/// - `DRAFTBOT_TRIAGE__TARGET_SENDER` → `triage.target_sender`
/// - `DRAFTBOT_TRIAGE__HISTORY_LIMIT` → `triage.history_limit`
/// - `DRAFTBOT_TRIAGE__RESOURCES_DIR` → `triage.resources_dir`
fn apply_env_overrides(mut config: Config) -> Config {
    // IMAP
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__HOST") {
        config.imap.host = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.imap.port = p;
        }
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__USERNAME") {
        config.imap.username = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__PASSWORD") {
        config.imap.password = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__ACCESS_TOKEN") {
        config.imap.access_token = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__MAILBOX") {
        config.imap.mailbox = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_IMAP__DRAFTS_FOLDER") {
        config.imap.drafts_folder = val;
    }

    // Ollama
    if let Ok(val) = std::env::var("DRAFTBOT_OLLAMA__BASE_URL") {
        config.ollama.base_url = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_OLLAMA__MODEL") {
        config.ollama.model = val;
    }

    // Triage
    if let Ok(val) = std::env::var("DRAFTBOT_TRIAGE__TARGET_SENDER") {
        config.triage.target_sender = val;
    }
    if let Ok(val) = std::env::var("DRAFTBOT_TRIAGE__HISTORY_LIMIT") {
        if let Ok(n) = val.parse::<usize>() {
            config.triage.history_limit = n;
        }
    }
    if let Ok(val) = std::env::var("DRAFTBOT_TRIAGE__RESOURCES_DIR") {
        config.triage.resources_dir = val;
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        // Should return defaults
        assert_eq!(config.imap.port, 993);
        assert_eq!(config.triage.history_limit, 5);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "imap": {
                "host": "outlook.office365.com",
                "username": "me@example.com"
            },
            "ollama": { "model": "mistral" }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.imap.host, "outlook.office365.com");
        assert_eq!(config.ollama.model, "mistral");
        // Default preserved
        assert_eq!(config.imap.mailbox, "INBOX");
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.imap.drafts_folder, "Drafts");
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.ollama.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.imap.host = "imap.example.com".to_string();
        config.triage.target_sender = "boss@example.com".to_string();

        save_config(&config, Some(&path)).unwrap();

        let reloaded = load_config_from_path(&path);
        assert_eq!(reloaded.imap.host, "imap.example.com");
        assert_eq!(reloaded.triage.target_sender, "boss@example.com");
    }

    #[test]
    fn test_env_override_model() {
        std::env::set_var("DRAFTBOT_OLLAMA__MODEL", "test-model");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.ollama.model, "test-model");
        std::env::remove_var("DRAFTBOT_OLLAMA__MODEL");
    }

    #[test]
    fn test_env_override_target_sender() {
        std::env::set_var("DRAFTBOT_TRIAGE__TARGET_SENDER", "vip@example.com");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.triage.target_sender, "vip@example.com");
        std::env::remove_var("DRAFTBOT_TRIAGE__TARGET_SENDER");
    }

    #[test]
    fn test_env_override_history_limit_rejects_garbage() {
        std::env::set_var("DRAFTBOT_TRIAGE__HISTORY_LIMIT", "not-a-number");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.triage.history_limit, 5);
        std::env::remove_var("DRAFTBOT_TRIAGE__HISTORY_LIMIT");
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        save_config(&Config::default(), Some(&path)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert!(raw["imap"].get("accessToken").is_some());
        assert!(raw["imap"].get("access_token").is_none());
    }
}
