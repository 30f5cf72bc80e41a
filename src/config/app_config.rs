//! Application configuration module for wolmcp
//!
//! Provides TOML-based configuration with environment variable override support.
//! Priority: CLI args > Environment variables > Config file > Defaults

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default language for searches and browsing (default: en)
    #[serde(default = "default_language")]
    default_language: String,

    /// Per-attempt fetch timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Maximum fetch attempts per request (default: 3)
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Base URL of the online library
    #[serde(default = "default_library_base_url")]
    library_base_url: String,

    /// Base URL of the publication-media JSON API
    #[serde(default = "default_media_api_base_url")]
    media_api_base_url: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_library_base_url() -> String {
    "https://wol.jw.org".to_string()
}

fn default_media_api_base_url() -> String {
    "https://b.jw-cdn.org/apis/pub-media".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            library_base_url: default_library_base_url(),
            media_api_base_url: default_media_api_base_url(),
        }
    }
}

impl AppConfig {
    /// Create config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| anyhow!("Failed to parse config file: {}", e))?;
        Ok(config)
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(lang) = std::env::var("WOLMCP_LANGUAGE") {
            config.default_language = lang;
        }

        if let Ok(timeout) = std::env::var("WOLMCP_TIMEOUT_SECS") {
            if let Ok(n) = timeout.parse() {
                config.timeout_secs = n;
            }
        }

        if let Ok(attempts) = std::env::var("WOLMCP_MAX_ATTEMPTS") {
            if let Ok(n) = attempts.parse() {
                config.max_attempts = n;
            }
        }

        if let Ok(base) = std::env::var("WOLMCP_LIBRARY_BASE_URL") {
            config.library_base_url = base;
        }

        if let Ok(base) = std::env::var("WOLMCP_MEDIA_API_BASE_URL") {
            config.media_api_base_url = base;
        }

        config
    }

    /// Merge with another config (other takes priority for non-default values)
    pub fn merge_with(&self, other: &Self) -> Self {
        Self {
            default_language: if other.default_language != default_language() {
                other.default_language.clone()
            } else {
                self.default_language.clone()
            },
            timeout_secs: if other.timeout_secs != default_timeout_secs() {
                other.timeout_secs
            } else {
                self.timeout_secs
            },
            max_attempts: if other.max_attempts != default_max_attempts() {
                other.max_attempts
            } else {
                self.max_attempts
            },
            library_base_url: if other.library_base_url != default_library_base_url() {
                other.library_base_url.clone()
            } else {
                self.library_base_url.clone()
            },
            media_api_base_url: if other.media_api_base_url != default_media_api_base_url() {
                other.media_api_base_url.clone()
            } else {
                self.media_api_base_url.clone()
            },
        }
    }

    /// Override default_language
    pub fn with_language(mut self, language: &str) -> Self {
        self.default_language = language.to_string();
        self
    }

    /// Override max_attempts
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Override library_base_url
    pub fn with_library_base_url(mut self, base: &str) -> Self {
        self.library_base_url = base.to_string();
        self
    }

    /// Override media_api_base_url
    pub fn with_media_api_base_url(mut self, base: &str) -> Self {
        self.media_api_base_url = base.to_string();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be greater than 0"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }

        if !self.library_base_url.starts_with("http") {
            return Err(anyhow!(
                "library_base_url must be an http(s) URL, got '{}'",
                self.library_base_url
            ));
        }

        Ok(())
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }

    // Getters
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn library_base_url(&self) -> &str {
        &self.library_base_url
    }

    pub fn media_api_base_url(&self) -> &str {
        &self.media_api_base_url
    }
}
