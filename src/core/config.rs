//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.cardchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Wi-Fi name, Wi-Fi password and the API key are required; the session
//! refuses to start without them (see [`Credentials::from_config`]).

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::Provider;
use crate::core::history::DEFAULT_MAX_EXCHANGES;
use crate::core::input::DEFAULT_MAX_MESSAGE_CHARS;
use crate::inference::{ApiKey, DEFAULT_SYSTEM_PROMPT};
use crate::inference::providers::{gemini, openrouter};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CardchatConfig {
    #[serde(default)]
    pub wifi: WifiConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WifiConfig {
    pub ssid: Option<String>,
    pub password: Option<Secret>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub provider: Option<Provider>,
    pub api_key: Option<ApiKey>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub max_exchanges: Option<usize>,
    pub max_message_chars: Option<usize>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub columns: Option<u16>,
    pub rows: Option<u16>,
}

/// A string that never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Roughly one or two short sentences.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 50;
/// Character grid of a small handheld screen.
pub const DEFAULT_DISPLAY_COLUMNS: u16 = 40;
pub const DEFAULT_DISPLAY_ROWS: u16 = 13;

// ============================================================================
// Resolved Config (concrete values, no Options except credentials)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    pub base_url: String,
    pub api_key: Option<ApiKey>,
    pub wifi_ssid: Option<String>,
    pub wifi_password: Option<Secret>,
    pub timeout: Duration,
    pub max_output_tokens: u32,
    pub max_exchanges: usize,
    pub max_message_chars: usize,
    pub system_prompt: String,
    pub display_columns: u16,
    pub display_rows: u16,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub columns: Option<u16>,
    pub rows: Option<u16>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// A required setting is absent. Carries the setting's config-file name.
    Missing(&'static str),
}

impl ConfigError {
    /// One-line message for the display banner.
    pub fn banner(&self) -> String {
        match self {
            ConfigError::Missing(name) => format!("Set {name} in config!"),
            ConfigError::Io(_) => "Config file unreadable!".to_string(),
            ConfigError::Parse(_) => "Config file is invalid!".to_string(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Missing(name) => write!(f, "missing required setting: {name}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.cardchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cardchat").join("config.toml"))
}

/// Load config from `~/.cardchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `CardchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<CardchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(CardchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(CardchatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: CardchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# cardchat Configuration
# Override hierarchy: defaults → this file → env vars → CLI flags.
# Wi-Fi ssid/password and api_key are required.

# [wifi]
# ssid = "my-network"                # Or set CARDCHAT_WIFI_SSID
# password = "..."                   # Or set CARDCHAT_WIFI_PASSWORD

# [api]
# provider = "gemini"                # "gemini" or "openrouter"
# api_key = "..."                    # Or CARDCHAT_API_KEY / GEMINI_API_KEY / OPENROUTER_API_KEY
# model = "gemini-2.5-flash-lite"
# base_url = "https://generativelanguage.googleapis.com/v1beta"
# timeout_secs = 30
# max_output_tokens = 50

# [chat]
# max_exchanges = 5                  # user/assistant pairs sent as context
# max_message_chars = 200
# system_prompt = "You are a helpful and friendly assistant..."

# [display]
# columns = 40
# rows = 13
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &CardchatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &CardchatConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // A blank variable counts as unset so it can't mask a later source
    let env_value = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .or_else(|| env_value("CARDCHAT_PROVIDER").and_then(|s| Provider::from_name(&s)))
        .or(config.api.provider)
        .unwrap_or_default();

    let (default_model, default_base_url, provider_key_var) = match provider {
        Provider::Gemini => (gemini::DEFAULT_MODEL, gemini::DEFAULT_BASE_URL, "GEMINI_API_KEY"),
        Provider::OpenRouter => (
            openrouter::DEFAULT_MODEL,
            openrouter::DEFAULT_BASE_URL,
            "OPENROUTER_API_KEY",
        ),
    };

    // Model: CLI → env → config → provider default
    let model_name = cli
        .model
        .clone()
        .or_else(|| env_value("CARDCHAT_MODEL"))
        .or_else(|| config.api.model.clone().filter(|m| !m.trim().is_empty()))
        .unwrap_or_else(|| default_model.to_string());

    let base_url = env_value("CARDCHAT_BASE_URL")
        .or_else(|| config.api.base_url.clone().filter(|u| !u.trim().is_empty()))
        .unwrap_or_else(|| default_base_url.to_string());

    // API key: env (generic, then provider-specific) → config
    let api_key = env_value("CARDCHAT_API_KEY")
        .or_else(|| env_value(provider_key_var))
        .map(ApiKey::new)
        .or_else(|| config.api.api_key.clone().filter(|k| !k.is_empty()));

    let wifi_ssid = env_value("CARDCHAT_WIFI_SSID")
        .or_else(|| config.wifi.ssid.clone().filter(|s| !s.trim().is_empty()));

    let wifi_password = env_value("CARDCHAT_WIFI_PASSWORD")
        .map(Secret::new)
        .or_else(|| config.wifi.password.clone().filter(|s| !s.expose().is_empty()));

    let system_prompt = config
        .chat
        .system_prompt
        .clone()
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    ResolvedConfig {
        provider,
        model_name,
        base_url,
        api_key,
        wifi_ssid,
        wifi_password,
        timeout: Duration::from_secs(config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        max_output_tokens: config
            .api
            .max_output_tokens
            .unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS),
        max_exchanges: config.chat.max_exchanges.unwrap_or(DEFAULT_MAX_EXCHANGES),
        max_message_chars: config
            .chat
            .max_message_chars
            .unwrap_or(DEFAULT_MAX_MESSAGE_CHARS),
        system_prompt,
        display_columns: cli
            .columns
            .or(config.display.columns)
            .unwrap_or(DEFAULT_DISPLAY_COLUMNS),
        display_rows: cli
            .rows
            .or(config.display.rows)
            .unwrap_or(DEFAULT_DISPLAY_ROWS),
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// The three settings a session can't start without.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub wifi_ssid: String,
    pub wifi_password: Secret,
    pub api_key: ApiKey,
}

impl Credentials {
    /// Checks that Wi-Fi name, Wi-Fi password and API key are all present.
    /// Reports the first missing one.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ConfigError> {
        let wifi_ssid = config
            .wifi_ssid
            .clone()
            .ok_or(ConfigError::Missing("wifi.ssid"))?;
        let wifi_password = config
            .wifi_password
            .clone()
            .ok_or(ConfigError::Missing("wifi.password"))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or(ConfigError::Missing("api.api_key"))?;

        Ok(Self {
            wifi_ssid,
            wifi_password,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn complete_config() -> CardchatConfig {
        CardchatConfig {
            wifi: WifiConfig {
                ssid: Some("home".to_string()),
                password: Some(Secret::new("hunter2")),
            },
            api: ApiConfig {
                api_key: Some(ApiKey::new("sk-test-123")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_parses() {
        let config = CardchatConfig::default();
        assert!(config.wifi.ssid.is_none());
        assert!(config.api.provider.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&CardchatConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.provider, Provider::Gemini);
        assert_eq!(resolved.model_name, gemini::DEFAULT_MODEL);
        assert_eq!(resolved.base_url, gemini::DEFAULT_BASE_URL);
        assert_eq!(resolved.max_output_tokens, DEFAULT_MAX_OUTPUT_TOKENS);
        assert_eq!(resolved.max_exchanges, DEFAULT_MAX_EXCHANGES);
        assert_eq!(resolved.max_message_chars, DEFAULT_MAX_MESSAGE_CHARS);
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(resolved.display_columns, DEFAULT_DISPLAY_COLUMNS);
        assert_eq!(resolved.display_rows, DEFAULT_DISPLAY_ROWS);
        assert_eq!(resolved.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = CardchatConfig {
            api: ApiConfig {
                provider: Some(Provider::OpenRouter),
                model: Some("my-model".to_string()),
                timeout_secs: Some(5),
                max_output_tokens: Some(80),
                ..Default::default()
            },
            chat: ChatConfig {
                max_exchanges: Some(3),
                max_message_chars: Some(120),
                system_prompt: Some("Custom prompt.".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.provider, Provider::OpenRouter);
        assert_eq!(resolved.model_name, "my-model");
        assert_eq!(resolved.base_url, openrouter::DEFAULT_BASE_URL);
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.max_output_tokens, 80);
        assert_eq!(resolved.max_exchanges, 3);
        assert_eq!(resolved.max_message_chars, 120);
        assert_eq!(resolved.system_prompt, "Custom prompt.");
    }

    #[test]
    fn test_resolve_env_overrides_config() {
        let config = complete_config();
        let env = |name: &str| match name {
            "CARDCHAT_API_KEY" => Some("env-key".to_string()),
            "CARDCHAT_WIFI_SSID" => Some("cafe".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.api_key.unwrap().expose(), "env-key");
        assert_eq!(resolved.wifi_ssid.as_deref(), Some("cafe"));
    }

    #[test]
    fn test_resolve_provider_specific_key_var() {
        let cli = CliOverrides {
            provider: Some(Provider::OpenRouter),
            ..Default::default()
        };
        let env = |name: &str| (name == "OPENROUTER_API_KEY").then(|| "sk-or-env".to_string());
        let resolved = resolve_with_env(&CardchatConfig::default(), &cli, env);
        assert_eq!(resolved.api_key.unwrap().expose(), "sk-or-env");
    }

    #[test]
    fn test_resolve_cli_wins() {
        let config = CardchatConfig {
            api: ApiConfig {
                provider: Some(Provider::OpenRouter),
                model: Some("config-model".to_string()),
                ..Default::default()
            },
            display: DisplayConfig {
                columns: Some(30),
                rows: Some(10),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            provider: Some(Provider::Gemini),
            model: Some("cli-model".to_string()),
            columns: Some(53),
            rows: None,
        };
        let env = |name: &str| (name == "CARDCHAT_PROVIDER").then(|| "openrouter".to_string());
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.provider, Provider::Gemini);
        assert_eq!(resolved.model_name, "cli-model");
        assert_eq!(resolved.display_columns, 53);
        assert_eq!(resolved.display_rows, 10);
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let config = CardchatConfig {
            wifi: WifiConfig {
                ssid: Some("  ".to_string()),
                password: Some(Secret::new("")),
            },
            api: ApiConfig {
                api_key: Some(ApiKey::new("")),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(resolved.wifi_ssid.is_none());
        assert!(resolved.wifi_password.is_none());
        assert!(resolved.api_key.is_none());
    }

    #[test]
    fn test_blank_env_does_not_mask_later_sources() {
        let env = |name: &str| match name {
            "CARDCHAT_API_KEY" | "CARDCHAT_WIFI_SSID" | "CARDCHAT_MODEL" => Some(" ".to_string()),
            "GEMINI_API_KEY" => Some("g-key".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&complete_config(), &CliOverrides::default(), env);
        assert_eq!(resolved.api_key.unwrap().expose(), "g-key");
        assert_eq!(resolved.wifi_ssid.as_deref(), Some("home"));
        assert_eq!(resolved.model_name, gemini::DEFAULT_MODEL);

        let env = |name: &str| (name == "CARDCHAT_API_KEY").then(String::new);
        let resolved = resolve_with_env(&complete_config(), &CliOverrides::default(), env);
        assert_eq!(resolved.api_key.unwrap().expose(), "sk-test-123");
    }

    #[test]
    fn test_credentials_complete() {
        let resolved = resolve_with_env(&complete_config(), &CliOverrides::default(), no_env);
        let creds = Credentials::from_config(&resolved).unwrap();
        assert_eq!(creds.wifi_ssid, "home");
        assert_eq!(creds.wifi_password.expose(), "hunter2");
        assert_eq!(creds.api_key.expose(), "sk-test-123");
    }

    #[test]
    fn test_credentials_missing_each_setting() {
        let mut config = complete_config();
        config.api.api_key = None;
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        let err = Credentials::from_config(&resolved).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("api.api_key")));
        assert_eq!(err.banner(), "Set api.api_key in config!");

        let mut config = complete_config();
        config.wifi.ssid = None;
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(matches!(
            Credentials::from_config(&resolved),
            Err(ConfigError::Missing("wifi.ssid"))
        ));

        let mut config = complete_config();
        config.wifi.password = None;
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(matches!(
            Credentials::from_config(&resolved),
            Err(ConfigError::Missing("wifi.password"))
        ));
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let resolved = resolve_with_env(&complete_config(), &CliOverrides::default(), no_env);
        let rendered = format!("{:?}", resolved);
        assert!(!rendered.contains("sk-test-123"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[wifi]
ssid = "home"
password = "hunter2"

[api]
provider = "openrouter"
api_key = "sk-test-123"
model = "google/gemini-2.5-flash-lite"
timeout_secs = 10

[chat]
max_exchanges = 4

[display]
columns = 53
rows = 15
"#;
        let config: CardchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.wifi.ssid.as_deref(), Some("home"));
        assert_eq!(config.api.provider, Some(Provider::OpenRouter));
        assert_eq!(
            config.api.api_key.as_ref().map(|k| k.expose()),
            Some("sk-test-123")
        );
        assert_eq!(config.api.timeout_secs, Some(10));
        assert_eq!(config.chat.max_exchanges, Some(4));
        assert_eq!(config.display.columns, Some(53));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[api]
model = "my-model"
"#;
        let config: CardchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.model.as_deref(), Some("my-model"));
        assert!(config.api.provider.is_none());
        assert!(config.wifi.ssid.is_none());
        assert!(config.display.columns.is_none());
    }

    #[test]
    fn test_unknown_provider_is_parse_error() {
        let toml_str = r#"
[api]
provider = "carrier-pigeon"
"#;
        assert!(toml::from_str::<CardchatConfig>(toml_str).is_err());
    }
}
