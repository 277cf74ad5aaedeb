//! Configuration resolution against real environment variables and files

use bookwise_common::config::{
    AppConfig, CliOverrides, TomlConfig, ENV_BASE_URL, ENV_CONFIG, ENV_DATABASE, ENV_GEMINI_API_KEY,
    ENV_PORT,
};
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

fn clear_env() {
    for name in [ENV_CONFIG, ENV_DATABASE, ENV_PORT, ENV_BASE_URL, ENV_GEMINI_API_KEY] {
        std::env::remove_var(name);
    }
}

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
#[serial]
fn test_toml_file_found_through_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
database_path = "/srv/bookwise/catalog.db"
port = 9000
base_url = "https://books.example.org/"

[logging]
level = "debug"

[images]
verify = false
"#,
    );
    std::env::set_var(ENV_CONFIG, &path);

    let config = AppConfig::resolve(&CliOverrides::default()).unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.database_path, PathBuf::from("/srv/bookwise/catalog.db"));
    assert_eq!(config.base_url, "https://books.example.org");
    assert_eq!(config.log_level, "debug");
    assert!(!config.images.verify);

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_file_and_cli_overrides_env() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = 9000\n");
    std::env::set_var(ENV_PORT, "9100");
    std::env::set_var(ENV_GEMINI_API_KEY, "abc123");

    let cli = CliOverrides {
        config_path: Some(path.clone()),
        ..Default::default()
    };
    let config = AppConfig::resolve(&cli).unwrap();
    assert_eq!(config.port, 9100);
    assert_eq!(config.ai.api_key.as_deref(), Some("abc123"));

    let cli = CliOverrides {
        config_path: Some(path),
        port: Some(9200),
        ..Default::default()
    };
    assert_eq!(AppConfig::resolve(&cli).unwrap().port, 9200);

    clear_env();
}

#[test]
#[serial]
fn test_blank_api_key_is_ignored() {
    clear_env();
    std::env::set_var(ENV_GEMINI_API_KEY, "   ");
    let dir = TempDir::new().unwrap();
    let cli = CliOverrides {
        config_path: Some(write_config(&dir, "")),
        ..Default::default()
    };

    assert!(AppConfig::resolve(&cli).unwrap().ai.api_key.is_none());
    clear_env();
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "port = \"not a number\"\n");

    assert!(TomlConfig::load(&path).is_err());
    let cli = CliOverrides {
        config_path: Some(path),
        ..Default::default()
    };
    assert!(AppConfig::resolve(&cli).is_err());
}

#[test]
#[serial]
fn test_invalid_port_in_env_is_an_error() {
    clear_env();
    std::env::set_var(ENV_PORT, "eighty");
    let dir = TempDir::new().unwrap();
    let cli = CliOverrides {
        config_path: Some(write_config(&dir, "")),
        ..Default::default()
    };

    assert!(AppConfig::resolve(&cli).is_err());
    clear_env();
}
