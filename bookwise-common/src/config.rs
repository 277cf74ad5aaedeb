//! Configuration loading and resolution
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ENV_CONFIG: &str = "BOOKWISE_CONFIG";
pub const ENV_DATABASE: &str = "BOOKWISE_DATABASE";
pub const ENV_PORT: &str = "BOOKWISE_PORT";
pub const ENV_BIND: &str = "BOOKWISE_BIND";
pub const ENV_BASE_URL: &str = "BOOKWISE_BASE_URL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_BASE_URL: &str = "https://bookwise.app";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional; anything missing falls through to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub bind_address: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ai: AiToml,
    #[serde(default)]
    pub images: ImagesToml,
    #[serde(default)]
    pub cache: CacheToml,
    #[serde(default)]
    pub sessions: SessionsToml,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiToml {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesToml {
    pub verify: Option<bool>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheToml {
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionsToml {
    pub idle_secs: Option<u64>,
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Values supplied on the command line; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
}

/// LLM integration settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// `None` disables chat (pages show a warning instead)
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Cover image probing settings
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub verify: bool,
    pub timeout_secs: u64,
}

/// Fully resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub base_url: String,
    pub log_level: String,
    pub ai: AiConfig,
    pub images: ImageConfig,
    pub cache_ttl_secs: u64,
    pub session_idle_secs: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI, environment, TOML and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let toml_config = match locate_config_file(cli.config_path.as_deref()) {
            Some(path) => {
                info!("Loading config file: {}", path.display());
                TomlConfig::load(&path)?
            }
            None => {
                info!("No config file found, using defaults");
                TomlConfig::default()
            }
        };

        Self::from_sources(cli, &toml_config, |name| std::env::var(name).ok())
    }

    /// Merge the configuration sources. `env` looks up an environment variable.
    pub fn from_sources(
        cli: &CliOverrides,
        toml_config: &TomlConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let database_path = cli
            .database_path
            .clone()
            .or_else(|| env(ENV_DATABASE).map(PathBuf::from))
            .or_else(|| toml_config.database_path.clone())
            .unwrap_or_else(default_database_path);

        let port = match cli.port {
            Some(port) => port,
            None => match env(ENV_PORT) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, raw)))?,
                None => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let bind_address = cli
            .bind_address
            .clone()
            .or_else(|| env(ENV_BIND))
            .or_else(|| toml_config.bind_address.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| env(ENV_BASE_URL))
            .or_else(|| toml_config.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_key = env(ENV_GEMINI_API_KEY)
            .or_else(|| toml_config.ai.api_key.clone())
            .filter(|key| is_valid_key(key));

        let ai = AiConfig {
            api_key,
            model: toml_config
                .ai
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            endpoint: toml_config
                .ai
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_AI_ENDPOINT.to_string()),
            timeout_secs: toml_config.ai.timeout_secs.unwrap_or(30),
        };

        let images = ImageConfig {
            verify: toml_config.images.verify.unwrap_or(true),
            timeout_secs: toml_config.images.timeout_secs.unwrap_or(5),
        };

        Ok(Self {
            database_path,
            bind_address,
            port,
            base_url,
            log_level: toml_config.logging.level.clone(),
            ai,
            images,
            cache_ttl_secs: toml_config.cache.ttl_secs.unwrap_or(300),
            session_idle_secs: toml_config.sessions.idle_secs.unwrap_or(86_400),
        })
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Find the config file: explicit path, then `BOOKWISE_CONFIG`, then platform locations
fn locate_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("bookwise").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/bookwise/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(dir) => dir.join("bookwise").join("bookwise.db"),
        None => {
            warn!("Could not determine data directory, using ./data");
            PathBuf::from("data").join("bookwise.db")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_configured() {
        let config =
            AppConfig::from_sources(&CliOverrides::default(), &TomlConfig::default(), env_from(&[]))
                .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, DEFAULT_BIND);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.log_level, "info");
        assert!(config.ai.api_key.is_none());
        assert_eq!(config.ai.model, DEFAULT_MODEL);
        assert!(config.images.verify);
        assert_eq!(config.cache_ttl_secs, 300);
        assert!(config.database_path.ends_with("bookwise.db"));
    }

    #[test]
    fn test_cli_beats_env_beats_toml() {
        let toml_config = TomlConfig {
            port: Some(7000),
            database_path: Some(PathBuf::from("/toml/db.sqlite")),
            ..Default::default()
        };
        let env = env_from(&[(ENV_PORT, "7100"), (ENV_DATABASE, "/env/db.sqlite")]);

        let from_env = AppConfig::from_sources(&CliOverrides::default(), &toml_config, &env).unwrap();
        assert_eq!(from_env.port, 7100);
        assert_eq!(from_env.database_path, PathBuf::from("/env/db.sqlite"));

        let cli = CliOverrides {
            port: Some(7200),
            ..Default::default()
        };
        let from_cli = AppConfig::from_sources(&cli, &toml_config, &env).unwrap();
        assert_eq!(from_cli.port, 7200);

        let from_toml =
            AppConfig::from_sources(&CliOverrides::default(), &toml_config, env_from(&[])).unwrap();
        assert_eq!(from_toml.port, 7000);
        assert_eq!(from_toml.database_path, PathBuf::from("/toml/db.sqlite"));
    }

    #[test]
    fn test_invalid_env_port_is_config_error() {
        let result = AppConfig::from_sources(
            &CliOverrides::default(),
            &TomlConfig::default(),
            env_from(&[(ENV_PORT, "not-a-port")]),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_blank_api_key_is_ignored() {
        let config = AppConfig::from_sources(
            &CliOverrides::default(),
            &TomlConfig::default(),
            env_from(&[(ENV_GEMINI_API_KEY, "   ")]),
        )
        .unwrap();
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AppConfig::from_sources(
            &CliOverrides::default(),
            &TomlConfig::default(),
            env_from(&[(ENV_BASE_URL, "https://example.org/")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://example.org");
    }

    #[test]
    fn test_toml_parses_nested_sections() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            port = 9000
            base_url = "https://books.example"

            [logging]
            level = "debug"

            [ai]
            api_key = "secret"
            model = "gemini-pro"

            [images]
            verify = false
            "#,
        )
        .unwrap();

        assert_eq!(parsed.port, Some(9000));
        assert_eq!(parsed.logging.level, "debug");
        assert_eq!(parsed.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(parsed.images.verify, Some(false));

        let config =
            AppConfig::from_sources(&CliOverrides::default(), &parsed, env_from(&[])).unwrap();
        assert_eq!(config.ai.api_key.as_deref(), Some("secret"));
        assert_eq!(config.ai.model, "gemini-pro");
        assert!(!config.images.verify);
    }
}
