//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tern_ai::providers::{
    get_api_key,
    google::{API_KEY_ENV_VARS, DEFAULT_BASE_URL, DEFAULT_MODEL},
};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "tern-relay.toml";

/// Configuration for the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Gemini API key. Prefer the GEMINI_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Model id used for every request
    pub model: String,
    /// Gemini API root
    pub base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl RelayConfig {
    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("TERN_RELAY_CONFIG") {
            return PathBuf::from(path);
        }
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Load config from file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Self {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        let mut config = Self::read_file(&path);
        config.apply_env();
        config
    }

    fn read_file(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
                Self::default()
            }
        }
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env(&mut self) {
        self.api_key = get_api_key(self.api_key.as_deref(), API_KEY_ENV_VARS).ok();

        if let Some(host) = std::env::var("TERN_RELAY_HOST")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            self.host = host;
        }

        if let Ok(port) = std::env::var("TERN_RELAY_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "ignoring invalid TERN_RELAY_PORT"),
            }
        }
    }

    /// Address to bind, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# tern-relay configuration file
# Place next to the binary as tern-relay.toml, or point TERN_RELAY_CONFIG at it.

host = "127.0.0.1"
port = 3000

# Model used for every request
model = "gemini-1.5-flash-latest"

# API root (override for proxies or tests)
base_url = "https://generativelanguage.googleapis.com/v1beta"

# API key (optional - GEMINI_API_KEY or GOOGLE_API_KEY is used when unset)
# It's recommended to use environment variables instead for security
# api_key = "..."
"#
}
