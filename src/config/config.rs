use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api_client::{API_BASE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Lookup endpoint, the BIN is appended as a path segment
    pub base_url: String,

    /// Proxy used for both http and https (e.g. "http://proxy:3128")
    pub proxy: Option<String>,

    /// Overall request timeout in seconds
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
    Raw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Output format used when no flag is given
    pub format: OutputFormat,

    /// Show the country flag emoji in table output
    pub use_glyphs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE.to_string(),
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            use_glyphs: true,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(target: "config", "No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        tracing::debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("binlookup").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        format!(
            r#"# binlookup configuration file
# Location: ~/.config/binlookup/config.toml (Linux)
#           %APPDATA%\binlookup\config.toml (Windows)

[client]
# Lookup endpoint; the BIN is appended as the last path segment
base_url = "{base_url}"

# Proxy for both http and https requests (leave commented for a direct connection)
# proxy = "http://proxy.example.com:3128"

# Overall request timeout in seconds
timeout_secs = {timeout}

# Connect timeout in seconds
connect_timeout_secs = {connect_timeout}

[display]
# Default output: "table", "json" (mapped record) or "raw" (service body)
format = "table"

# Show the country flag emoji in table output
use_glyphs = true
"#,
            base_url = API_BASE,
            timeout = DEFAULT_TIMEOUT.as_secs(),
            connect_timeout = DEFAULT_CONNECT_TIMEOUT.as_secs(),
        )
    }
}
