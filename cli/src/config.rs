//! Configuration file management
//!
//! # Configuration Format
//!
//! ```toml
//! [server]
//! url = "http://localhost:3001"  # Merx server URL
//! timeout = 30                   # Request timeout in seconds
//!
//! [ui]
//! format = "table"               # table, json, csv
//! color = true
//! spinner = true
//! loading_threshold_ms = 200     # Show a spinner only when a call outlasts this
//!
//! [auth]
//! default_realm = "platform"     # Realm offered first by \login
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CLIError, Result};

/// CLI configuration loaded from TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CLIConfiguration {
    /// Server connection settings
    pub server: Option<ServerConfig>,

    /// UI preferences
    pub ui: Option<UIConfig>,

    /// Authentication settings
    pub auth: Option<AuthConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server URL (e.g., http://localhost:3001)
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Output format: table, json, csv
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Enable loading spinners
    #[serde(default = "default_spinner")]
    pub spinner: bool,

    /// Delay before a loading spinner appears, in milliseconds
    #[serde(default = "default_loading_threshold_ms")]
    pub loading_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Realm offered first by the login prompt: "platform" or "merchant"
    #[serde(default = "default_realm")]
    pub default_realm: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_format() -> String {
    "table".to_string()
}

fn default_color() -> bool {
    true
}

fn default_spinner() -> bool {
    true
}

fn default_loading_threshold_ms() -> u64 {
    200
}

fn default_realm() -> String {
    "platform".to_string()
}

impl Default for CLIConfiguration {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                url: Some(merx_link::DEFAULT_BASE_URL.to_string()),
                timeout: default_timeout(),
            }),
            ui: Some(UIConfig {
                format: default_format(),
                color: default_color(),
                spinner: default_spinner(),
                loading_threshold_ms: default_loading_threshold_ms(),
            }),
            auth: None,
        }
    }
}

pub fn expand_config_path(path: &Path) -> PathBuf {
    let path_str = path.to_str().unwrap_or("~/.merx/config.toml");
    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(rest);
        }
    }
    path.to_path_buf()
}

pub fn default_config_path() -> PathBuf {
    expand_config_path(Path::new("~/.merx/config.toml"))
}

impl CLIConfiguration {
    /// Load configuration from file
    ///
    /// Returns default configuration if file doesn't exist.
    pub fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            CLIError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        let config: CLIConfiguration = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let expanded_path = expand_config_path(path);
        let path = &expanded_path;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CLIError::ConfigurationError(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn resolved_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or(ServerConfig {
            url: None,
            timeout: default_timeout(),
        })
    }

    pub fn resolved_ui(&self) -> UIConfig {
        self.ui.clone().unwrap_or(UIConfig {
            format: default_format(),
            color: default_color(),
            spinner: default_spinner(),
            loading_threshold_ms: default_loading_threshold_ms(),
        })
    }

    pub fn resolved_auth(&self) -> AuthConfig {
        self.auth.clone().unwrap_or(AuthConfig {
            default_realm: default_realm(),
        })
    }
}
