//! # Application Configuration
//!
//! Settings resolved once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`, `--report-dir`)
//! 2. Environment variables (`BOOKSTORE_*`)
//! 3. `.env` file in the working directory
//! 4. Defaults (this file)
//!
//! | Variable                    | Default                               |
//! |-----------------------------|---------------------------------------|
//! | `BOOKSTORE_DB_PATH`         | `<data dir>/bookstore/bookstore.db`   |
//! | `BOOKSTORE_REPORT_DIR`      | current directory                     |
//! | `BOOKSTORE_CURRENCY`        | `Ksh`                                 |
//! | `BOOKSTORE_MAX_CONNECTIONS` | `5`                                   |

use directories::ProjectDirs;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const ENV_DB_PATH: &str = "BOOKSTORE_DB_PATH";
pub const ENV_REPORT_DIR: &str = "BOOKSTORE_REPORT_DIR";
pub const ENV_CURRENCY: &str = "BOOKSTORE_CURRENCY";
pub const ENV_MAX_CONNECTIONS: &str = "BOOKSTORE_MAX_CONNECTIONS";

const DEFAULT_CURRENCY: &str = "Ksh";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DB_FILE_NAME: &str = "bookstore.db";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    /// SQLite database file.
    pub db_path: PathBuf,

    /// Directory CSV reports are written into.
    pub report_dir: PathBuf,

    /// Currency label shown next to prices (display only).
    pub currency: String,

    /// Connection pool size.
    pub max_connections: u32,
}

/// Values given on the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env` (if present), then resolves from the process environment.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
        }

        Self::from_lookup(|key| env::var(key).ok(), overrides)
    }

    /// Resolves configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F, overrides: &ConfigOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match (&overrides.db_path, non_empty(ENV_DB_PATH)) {
            (Some(path), _) => path.clone(),
            (None, Some(path)) => PathBuf::from(path),
            (None, None) => default_db_path(),
        };

        let report_dir = match (&overrides.report_dir, non_empty(ENV_REPORT_DIR)) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => PathBuf::from(dir),
            (None, None) => PathBuf::from("."),
        };

        let currency = non_empty(ENV_CURRENCY)
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let max_connections = match non_empty(ENV_MAX_CONNECTIONS) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MAX_CONNECTIONS.to_string(),
                        value: raw,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(AppConfig {
            db_path,
            report_dir,
            currency,
            max_connections,
        })
    }
}

/// Platform data directory, falling back to the working directory.
///
/// - Linux: `~/.local/share/bookstore/bookstore.db`
/// - macOS: `~/Library/Application Support/bookstore/bookstore.db`
/// - Windows: `%APPDATA%\bookstore\data\bookstore.db`
fn default_db_path() -> PathBuf {
    match ProjectDirs::from("", "", "bookstore") {
        Some(dirs) => dirs.data_dir().join(DB_FILE_NAME),
        None => PathBuf::from(DB_FILE_NAME),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Cannot prepare {path}: {reason}")]
    Unusable { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]), &ConfigOverrides::default()).unwrap();

        assert_eq!(config.currency, "Ksh");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.report_dir, PathBuf::from("."));
        assert!(config.db_path.ends_with(DB_FILE_NAME));
    }

    #[test]
    fn test_env_values() {
        let config = AppConfig::from_lookup(
            lookup(&[
                (ENV_DB_PATH, "/data/shop.db"),
                (ENV_REPORT_DIR, "/data/reports"),
                (ENV_CURRENCY, "USD"),
                (ENV_MAX_CONNECTIONS, "2"),
            ]),
            &ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/shop.db"));
        assert_eq!(config.report_dir, PathBuf::from("/data/reports"));
        assert_eq!(config.currency, "USD");
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn test_flags_override_env() {
        let overrides = ConfigOverrides {
            db_path: Some(PathBuf::from("flag.db")),
            report_dir: Some(PathBuf::from("out")),
        };
        let config = AppConfig::from_lookup(
            lookup(&[(ENV_DB_PATH, "env.db"), (ENV_REPORT_DIR, "env-out")]),
            &overrides,
        )
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("flag.db"));
        assert_eq!(config.report_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_blank_env_falls_back_to_default() {
        let config = AppConfig::from_lookup(
            lookup(&[(ENV_CURRENCY, "  "), (ENV_MAX_CONNECTIONS, "")]),
            &ConfigOverrides::default(),
        )
        .unwrap();

        assert_eq!(config.currency, "Ksh");
        assert_eq!(config.max_connections, 5);
    }

    #[test]
    fn test_invalid_max_connections() {
        for bad in ["lots", "0", "-3"] {
            let err = AppConfig::from_lookup(
                lookup(&[(ENV_MAX_CONNECTIONS, bad)]),
                &ConfigOverrides::default(),
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_MAX_CONNECTIONS));
        }
    }
}
