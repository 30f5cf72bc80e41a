//! Path resolution module for wolmcp
//!
//! Provides utilities for locating the configuration file with support for:
//! - Tilde (~) expansion to home directory
//! - XDG Base Directory specification compliance

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Expand tilde (~) in path to home directory
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if let Some(stripped) = path.strip_prefix('~') {
        let home =
            std::env::var("HOME").map_err(|_| anyhow!("HOME environment variable not set"))?;
        if stripped.is_empty() {
            Ok(PathBuf::from(home))
        } else if stripped.starts_with('/') {
            Ok(PathBuf::from(format!("{}{}", home, stripped)))
        } else {
            // ~username format not supported, return as-is
            Ok(PathBuf::from(path))
        }
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Get the XDG config directory for wolmcp
///
/// Returns: $XDG_CONFIG_HOME/wolmcp or ~/.config/wolmcp
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("wolmcp")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config").join("wolmcp")
    } else {
        PathBuf::from(".config").join("wolmcp")
    }
}

/// Get the default config file path
pub fn get_default_config_path() -> PathBuf {
    get_config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_with_tilde() {
        let result = expand_home("~").unwrap();
        assert!(!result.to_str().unwrap().contains('~'));
    }

    #[test]
    fn test_expand_home_absolute() {
        let result = expand_home("/absolute/path").unwrap();
        assert_eq!(result.to_str().unwrap(), "/absolute/path");
    }

    #[test]
    fn test_get_config_dir_contains_wolmcp() {
        let dir = get_config_dir();
        assert!(dir.to_str().unwrap().contains("wolmcp"));
    }

    #[test]
    fn test_default_config_path_is_toml() {
        let path = get_default_config_path();
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }
}
