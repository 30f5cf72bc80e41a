//! Configuration tests
//!
//! Covers configuration file and environment variable support:
//! 1. Load config from TOML file
//! 2. Environment variable override
//! 3. Default values
//! 4. Priority: ENV > Config file > Default

use tempfile::TempDir;
use wolmcp::config::AppConfig;

#[test]
fn test_default_config() {
    let config = AppConfig::default();
    assert_eq!(config.default_language(), "en");
    assert_eq!(config.timeout_secs(), 30);
    assert_eq!(config.max_attempts(), 3);
    assert_eq!(config.library_base_url(), "https://wol.jw.org");
    assert_eq!(
        config.media_api_base_url(),
        "https://b.jw-cdn.org/apis/pub-media"
    );
}

#[test]
fn test_load_from_toml() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    std::fs::write(
        &config_path,
        r#"
default_language = "es"
timeout_secs = 10
max_attempts = 5
"#,
    )
    .unwrap();

    let config = AppConfig::from_file(&config_path).unwrap();
    assert_eq!(config.default_language(), "es");
    assert_eq!(config.timeout_secs(), 10);
    assert_eq!(config.max_attempts(), 5);
    // Unset fields keep their defaults
    assert_eq!(config.library_base_url(), "https://wol.jw.org");
}

#[test]
fn test_env_override() {
    std::env::set_var("WOLMCP_LANGUAGE", "fr");

    let config = AppConfig::from_env();
    assert_eq!(config.default_language(), "fr");

    std::env::remove_var("WOLMCP_LANGUAGE");
}

#[test]
fn test_merge_priority() {
    // Tests run in parallel within this binary; every test asserting on
    // from_env output must use env vars no other test touches.
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    std::fs::write(
        &config_path,
        r#"
timeout_secs = 12
max_attempts = 4
"#,
    )
    .unwrap();

    std::env::set_var("WOLMCP_MAX_ATTEMPTS", "7");

    let file_config = AppConfig::from_file(&config_path).unwrap();
    let env_config = AppConfig::from_env();
    let merged = file_config.merge_with(&env_config);

    // ENV should override file
    assert_eq!(merged.max_attempts(), 7);
    // File value should be preserved where ENV is not set
    assert_eq!(merged.timeout_secs(), 12);

    std::env::remove_var("WOLMCP_MAX_ATTEMPTS");
}

#[test]
fn test_validate_rejects_bad_base_url() {
    let config = AppConfig::default().with_library_base_url("ftp://nope");
    assert!(config.validate().is_err());
}

#[test]
fn test_toml_round_trip() {
    let config = AppConfig::default().with_language("pt");
    let toml_str = config.to_toml().unwrap();
    let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
    assert_eq!(parsed.default_language(), "pt");
    assert_eq!(parsed.max_attempts(), 3);
}
