//! Client configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.laws/` by default) into
//! [`ClientConfig`], then applies `LAWS_*` environment overrides. A missing
//! or malformed file falls back to defaults.

use std::path::Path;

use laws_types::config::ClientConfig;
use laws_types::error::ConfigError;

pub const ENV_UPLOAD_URL: &str = "LAWS_UPLOAD_URL";
pub const ENV_UPLOAD_URL_SECONDARY: &str = "LAWS_UPLOAD_URL_SECONDARY";
pub const ENV_CHAT_URL: &str = "LAWS_CHAT_URL";
pub const ENV_CHAT_URL_SECONDARY: &str = "LAWS_CHAT_URL_SECONDARY";
pub const ENV_DELETE_URL: &str = "LAWS_DELETE_URL";
pub const ENV_TOKEN_LIMIT: &str = "LAWS_TOKEN_LIMIT";

/// Load client configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ClientConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_client_config(data_dir: &Path) -> ClientConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ClientConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ClientConfig::default();
        }
    };

    match toml::from_str::<ClientConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ClientConfig::default()
        }
    }
}

/// Apply `LAWS_*` overrides using `lookup` to read variables.
///
/// Blank values are ignored. A token limit that is not a positive integer is
/// rejected.
pub fn apply_overrides<F>(mut config: ClientConfig, lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(v) = read(ENV_UPLOAD_URL) {
        config.upload_url = Some(v);
    }
    if let Some(v) = read(ENV_UPLOAD_URL_SECONDARY) {
        config.upload_url_secondary = Some(v);
    }
    if let Some(v) = read(ENV_CHAT_URL) {
        config.chat_url = Some(v);
    }
    if let Some(v) = read(ENV_CHAT_URL_SECONDARY) {
        config.chat_url_secondary = Some(v);
    }
    if let Some(v) = read(ENV_DELETE_URL) {
        config.delete_url = Some(v);
    }
    if let Some(v) = read(ENV_TOKEN_LIMIT) {
        config.token_limit = parse_token_limit(&v)?;
    }

    Ok(config)
}

fn parse_token_limit(value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(limit) if limit > 0 => Ok(limit),
        Ok(_) => Err(ConfigError::Invalid {
            key: ENV_TOKEN_LIMIT.to_string(),
            message: "must be greater than zero".to_string(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            key: ENV_TOKEN_LIMIT.to_string(),
            message: format!("'{value}' is not a whole number: {e}"),
        }),
    }
}

/// Load the config file and apply process environment overrides.
pub async fn resolve_client_config(data_dir: &Path) -> Result<ClientConfig, ConfigError> {
    let config = load_client_config(data_dir).await;
    apply_overrides(config, |key| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[tokio::test]
    async fn load_client_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.token_limit, 100_000);
    }

    #[tokio::test]
    async fn load_client_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
chat_url = "http://primary:8000/chat"
chat_url_secondary = "http://secondary:8000/chat"
token_limit = 2500
"#,
        )
        .await
        .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config.chat_url.as_deref(), Some("http://primary:8000/chat"));
        assert_eq!(config.token_limit, 2500);
        assert!(config.upload_url.is_none());
    }

    #[tokio::test]
    async fn load_client_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_client_config(tmp.path()).await;
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn overrides_replace_file_values() {
        let base = ClientConfig {
            chat_url: Some("http://file/chat".to_string()),
            ..ClientConfig::default()
        };
        let config = apply_overrides(
            base,
            env(&[
                (ENV_CHAT_URL, "http://env/chat"),
                (ENV_UPLOAD_URL_SECONDARY, "http://env2/upload"),
                (ENV_TOKEN_LIMIT, " 500 "),
            ]),
        )
        .unwrap();

        assert_eq!(config.chat_url.as_deref(), Some("http://env/chat"));
        assert_eq!(config.upload_url_secondary.as_deref(), Some("http://env2/upload"));
        assert_eq!(config.token_limit, 500);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let base = ClientConfig {
            delete_url: Some("http://file/delete".to_string()),
            ..ClientConfig::default()
        };
        let config = apply_overrides(base, env(&[(ENV_DELETE_URL, "  ")])).unwrap();
        assert_eq!(config.delete_url.as_deref(), Some("http://file/delete"));
    }

    #[test]
    fn invalid_token_limit_is_rejected() {
        let err = apply_overrides(ClientConfig::default(), env(&[(ENV_TOKEN_LIMIT, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == ENV_TOKEN_LIMIT));

        assert!(apply_overrides(ClientConfig::default(), env(&[(ENV_TOKEN_LIMIT, "0")])).is_err());
    }
}
