/// Credential configuration
///
/// The remove.bg API key is never embedded in source. It is read from the
/// `REMOVE_BG_API_KEY` environment variable, falling back to a JSON config
/// file stored next to the persisted history:
///
///   {data_dir}/bg-remover/config.json  →  {"api_key": "..."}

use log::info;
use serde::Deserialize;
use std::fs;

use crate::state::history;

/// Environment variable checked first for the API credential
pub const API_KEY_ENV: &str = "REMOVE_BG_API_KEY";

#[derive(Deserialize)]
struct ConfigFile {
    api_key: Option<String>,
}

/// Load the API credential, if configured anywhere.
///
/// A missing credential is not fatal at startup; submissions are rejected
/// with a visible notice until one is provided.
pub fn load_api_key() -> Option<String> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        let key = key.trim();
        if !key.is_empty() {
            info!("🔑 Using API key from ${}", API_KEY_ENV);
            return Some(key.to_string());
        }
    }

    let path = history::storage_dir().join("config.json");
    let json = fs::read_to_string(&path).ok()?;
    let key = api_key_from_json(&json)?;
    info!("🔑 Using API key from {}", path.display());
    Some(key)
}

/// Extract a non-empty `api_key` from config-file JSON
fn api_key_from_json(json: &str) -> Option<String> {
    let config: ConfigFile = serde_json::from_str(json).ok()?;
    config
        .api_key
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_api_key() {
        let json = r#"{ "api_key": "abc123" }"#;
        assert_eq!(api_key_from_json(json), Some("abc123".to_string()));
    }

    #[test]
    fn test_trims_whitespace() {
        let json = r#"{ "api_key": "  abc123\n" }"#;
        assert_eq!(api_key_from_json(json), Some("abc123".to_string()));
    }

    #[test]
    fn test_missing_or_empty_key() {
        assert_eq!(api_key_from_json(r#"{}"#), None);
        assert_eq!(api_key_from_json(r#"{ "api_key": "" }"#), None);
        assert_eq!(api_key_from_json(r#"{ "api_key": "   " }"#), None);
    }

    #[test]
    fn test_malformed_config() {
        assert_eq!(api_key_from_json("{ not json"), None);
    }
}
