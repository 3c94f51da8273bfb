use std::{env::var, path::PathBuf};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

pub const STORE_ENV: &str = "STUDYDASH_STORE";
pub const LOG_ENV: &str = "STUDYDASH_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level '{0}' in STUDYDASH_LOG, expected trace, debug, info, warn or error")]
    InvalidLogLevel(String),

    #[error("Failed to create data directory '{path}': {source}")]
    DataDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install the log subscriber: {0}")]
    Logging(#[from] tracing::subscriber::SetGlobalDefaultError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub store_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Resolves from the command line flags, then the environment, then the
    /// platform data directory.
    pub fn load(store_flag: Option<PathBuf>, verbosity: u8) -> Result<Config, ConfigError> {
        Config::resolve(
            store_flag,
            var(STORE_ENV).ok(),
            var(LOG_ENV).ok(),
            verbosity,
            dirs::data_local_dir(),
        )
    }

    fn resolve(
        store_flag: Option<PathBuf>,
        store_env: Option<String>,
        log_env: Option<String>,
        verbosity: u8,
        data_dir: Option<PathBuf>,
    ) -> Result<Config, ConfigError> {
        let store_path = store_flag
            .or_else(|| store_env.filter(|s| !s.is_empty()).map(PathBuf::from))
            .unwrap_or_else(|| {
                data_dir
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("studydash")
                    .join("store.json")
            });

        let log_level = match verbosity {
            0 => match log_env {
                Some(level) => level
                    .parse()
                    .map_err(|_| ConfigError::InvalidLogLevel(level))?,
                None => Level::WARN,
            },
            1 => Level::INFO,
            _ => Level::DEBUG,
        };

        Ok(Config {
            store_path,
            log_level,
        })
    }

    /// Creates the directory holding the store file if it doesn't exist
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.store_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::DataDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }
}

/// Installs the global subscriber. Logs go to stderr so they never mix
/// with command output.
pub fn init_logging(level: Level) -> Result<(), ConfigError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_env_and_default() {
        let config = Config::resolve(
            Some(PathBuf::from("/tmp/flag.json")),
            Some("/tmp/env.json".to_string()),
            None,
            0,
            Some(PathBuf::from("/data")),
        )
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/flag.json"));
    }

    #[test]
    fn test_env_wins_over_default() {
        let config = Config::resolve(
            None,
            Some("/tmp/env.json".to_string()),
            None,
            0,
            Some(PathBuf::from("/data")),
        )
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/env.json"));
    }

    #[test]
    fn test_default_store_path_under_data_dir() {
        let config = Config::resolve(None, None, None, 0, Some(PathBuf::from("/data"))).unwrap();
        assert_eq!(
            config.store_path,
            PathBuf::from("/data/studydash/store.json")
        );
        assert_eq!(config.log_level, Level::WARN);
    }

    #[test]
    fn test_verbosity_and_log_env() {
        let verbose = Config::resolve(None, None, Some("error".to_string()), 1, None).unwrap();
        assert_eq!(verbose.log_level, Level::INFO);

        let very_verbose = Config::resolve(None, None, None, 3, None).unwrap();
        assert_eq!(very_verbose.log_level, Level::DEBUG);

        let from_env = Config::resolve(None, None, Some("debug".to_string()), 0, None).unwrap();
        assert_eq!(from_env.log_level, Level::DEBUG);

        let bad = Config::resolve(None, None, Some("loud".to_string()), 0, None);
        assert!(matches!(bad, Err(ConfigError::InvalidLogLevel(_))));
    }
}
