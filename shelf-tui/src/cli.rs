//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;
use libbookshelf::config::{expand_path, resolve_data_path, Config};
use libbookshelf::logging::{LogFormat, LogTarget, LoggingConfig};
use libbookshelf::Result;

/// Terminal UI for the Bookshelf catalog
#[derive(Parser, Debug)]
#[command(name = "shelf-tui")]
#[command(version, about)]
#[command(long_about = "Search, browse, add and edit books in a remote catalog.

Search results are cached per query and sort direction for the configured
TTL (default 5 minutes). Press r to bypass the cache.

Logs are written to a file because the terminal belongs to the UI.")]
pub struct Args {
    /// Configuration file (default: ~/.config/bookshelf/config.toml)
    #[arg(long, env = "BOOKSHELF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Book service base URL, overrides the configuration file
    #[arg(long, env = "BOOKSHELF_API_URL")]
    pub api_url: Option<String>,

    /// Log file (default: <data dir>/bookshelf/shelf-tui.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Minimum log level (error, warn, info, debug, trace)
    #[arg(long, env = "BOOKSHELF_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format: text, json or pretty
    #[arg(long, env = "BOOKSHELF_LOG_FORMAT", default_value = "text")]
    pub log_format: LogFormat,
}

impl Args {
    /// Load the configuration file named by `--config`, or the default one,
    /// then apply `--api-url`
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load_from_path(&expand_path(&path.to_string_lossy()))?;
                config.apply_env_overrides();
                config
            }
            None => Config::load()?,
        };

        if let Some(url) = &self.api_url {
            config.api.base_url = url.clone();
        }
        config.validate()?;
        Ok(config)
    }

    /// Logging setup writing to the chosen log file
    pub fn logging_config(&self) -> Result<LoggingConfig> {
        let path = match &self.log_file {
            Some(path) => path.clone(),
            None => resolve_data_path()?.join("shelf-tui.log"),
        };

        Ok(LoggingConfig::new(self.log_format, self.log_level.clone(), false)
            .with_target(LogTarget::File(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["shelf-tui"]).unwrap();
        assert!(args.log_file.is_none());
        assert!(args.api_url.is_none() || std::env::var("BOOKSHELF_API_URL").is_ok());
    }

    #[test]
    fn test_log_format_flag() {
        let args = Args::try_parse_from(["shelf-tui", "--log-format", "json"]).unwrap();
        assert_eq!(args.log_format, LogFormat::Json);

        assert!(Args::try_parse_from(["shelf-tui", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn test_explicit_log_file() {
        let args =
            Args::try_parse_from(["shelf-tui", "--log-file", "/tmp/shelf.log"]).unwrap();
        let logging = args.logging_config().unwrap();
        assert_eq!(logging.target, LogTarget::File(PathBuf::from("/tmp/shelf.log")));
    }
}
