//! Application configuration for pagemill.
//!
//! User config lives at `~/.pagemill/pagemill.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PagemillError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pagemill.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pagemill";

// ---------------------------------------------------------------------------
// Config structs (matching pagemill.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Block store (Notion API) settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Name of the env var holding the API token (never store the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Identifier of the catalog database holding post entries.
    #[serde(default)]
    pub database_id: Option<String>,

    /// API version sent with every request.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Records requested per pagination page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            database_id: None,
            api_version: default_api_version(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "NOTION_TOKEN".into()
}
fn default_api_version() -> String {
    "2022-06-28".into()
}
fn default_page_size() -> u32 {
    100
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Serving profile: "production" or "development".
    ///
    /// Development surfaces posts in the Testing category; production hides
    /// them from every catalog query.
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "production".into()
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Parsed serving profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Development,
    Production,
}

impl AppConfig {
    /// Parse the configured profile string.
    pub fn profile(&self) -> Result<Profile> {
        match self.defaults.profile.as_str() {
            "development" => Ok(Profile::Development),
            "production" => Ok(Profile::Production),
            other => Err(PagemillError::config(format!(
                "unknown profile '{other}' (expected 'production' or 'development')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pagemill/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PagemillError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pagemill/pagemill.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PagemillError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| PagemillError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PagemillError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PagemillError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PagemillError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API token from the configured env var.
pub fn resolve_api_token(config: &AppConfig) -> Result<String> {
    let var_name = &config.notion.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(PagemillError::config(format!(
            "API token not found. Set the {var_name} environment variable \
             to an integration token with read access."
        ))),
    }
}

/// The catalog database id, or a config error telling the user where to set it.
pub fn require_database_id(config: &AppConfig) -> Result<&str> {
    config
        .notion
        .database_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            PagemillError::config(
                "no catalog database configured. Set notion.database_id in pagemill.toml \
                 or pass --database.",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("NOTION_TOKEN"));
        assert!(toml_str.contains("2022-06-28"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.notion.page_size, 100);
        assert_eq!(parsed.defaults.profile, "production");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[notion]
database_id = "b7dbfd9e-4c3a-44a9-9cb2-5afe62a9a8d5"

[defaults]
profile = "development"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.notion.api_key_env, "NOTION_TOKEN");
        assert_eq!(config.notion.page_size, 100);
        assert_eq!(config.profile().unwrap(), Profile::Development);
        assert_eq!(
            require_database_id(&config).unwrap(),
            "b7dbfd9e-4c3a-44a9-9cb2-5afe62a9a8d5"
        );
    }

    #[test]
    fn unknown_profile_rejected() {
        let config: AppConfig = toml::from_str("[defaults]\nprofile = \"staging\"\n").expect("parse");
        assert!(config.profile().is_err());
    }

    #[test]
    fn missing_database_id_is_config_error() {
        let config = AppConfig::default();
        let result = require_database_id(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("database"));
    }

    #[test]
    fn api_token_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.notion.api_key_env = "PM_TEST_NONEXISTENT_TOKEN_12345".into();
        let result = resolve_api_token(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API token not found"));
    }
}
