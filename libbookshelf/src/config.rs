//! Configuration management for Bookshelf

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

pub const DEFAULT_API_URL: &str = "http://64.227.142.191:8080/application-test-v1.1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout, humantime syntax ("30s", "1m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached search stays fresh, humantime syntax
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_ttl() -> String {
    "5m".to_string()
}

fn default_page_size() -> usize {
    crate::pagination::DEFAULT_PAGE_SIZE
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: default_ttl() }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file is not an error: the defaults are used. Environment
    /// overrides are applied either way.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        let mut config = if config_path.exists() {
            Self::load_from_path(&config_path)?
        } else {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// `BOOKSHELF_API_URL` replaces `api.base_url`
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("BOOKSHELF_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }
    }

    /// Check that every value can be used
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        reqwest::Url::parse(&self.api.base_url).map_err(|e| ConfigError::InvalidValue {
            field: "api.base_url".to_string(),
            reason: e.to_string(),
        })?;
        self.api_timeout()?;
        self.cache_ttl()?;
        Ok(())
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration_field("api.timeout", &self.api.timeout)
    }

    pub fn cache_ttl(&self) -> Result<Duration> {
        parse_duration_field("cache.ttl", &self.cache.ttl)
    }
}

fn parse_duration_field(field: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value.trim()).map_err(|e| {
        ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("{} (expected a duration like \"5m\" or \"30s\")", e),
        }
        .into()
    })
}

/// Expand a leading `~` to the home directory
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).to_string())
}

/// Resolve the configuration file path following the XDG base directory layout
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("BOOKSHELF_CONFIG") {
        return Ok(expand_path(&path));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("bookshelf").join("config.toml"))
}

/// Resolve the data directory path following the XDG base directory layout
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("bookshelf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookshelfError;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(300));
        assert_eq!(config.api_timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(config.ui.page_size, 10);
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
            [cache]
            ttl = "90s"
            "#,
        )
        .unwrap();

        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(90));
        assert_eq!(config.api.base_url, DEFAULT_API_URL);
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_parse_rejects_bad_duration() {
        let result = Config::parse(
            r#"
            [api]
            timeout = "soon"
            "#,
        );
        match result {
            Err(BookshelfError::Config(ConfigError::InvalidValue { field, .. })) => {
                assert_eq!(field, "api.timeout")
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_url() {
        let result = Config::parse(
            r#"
            [api]
            base_url = "not a url"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://localhost:9000/api\"\n\n[ui]\npage_size = 25"
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000/api");
        assert_eq!(config.ui.page_size, 25);
    }

    #[test]
    fn test_load_from_missing_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_path(&dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(BookshelfError::Config(ConfigError::ReadError(_)))
        ));
    }

    #[test]
    #[serial]
    fn test_load_uses_env_path_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[cache]\nttl = \"1m\"\n").unwrap();

        std::env::set_var("BOOKSHELF_CONFIG", &path);
        std::env::set_var("BOOKSHELF_API_URL", "http://127.0.0.1:8080");
        let config = Config::load();
        std::env::remove_var("BOOKSHELF_CONFIG");
        std::env::remove_var("BOOKSHELF_API_URL");

        let config = config.unwrap();
        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(60));
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    #[serial]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("BOOKSHELF_CONFIG", dir.path().join("absent.toml"));
        let config = Config::load();
        std::env::remove_var("BOOKSHELF_CONFIG");

        assert_eq!(config.unwrap().api.base_url, DEFAULT_API_URL);
    }
}
