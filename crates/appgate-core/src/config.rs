//! Configuration loaded from environment variables.
//!
//! | variable                | meaning                                       |
//! |-------------------------|-----------------------------------------------|
//! | `APPGATE_REGISTRY_FILE` | JSON file with the ExApp records to serve     |
//! | `APPGATE_AA_VERSION`    | value sent as `AA-VERSION`                    |
//! | `LOG_LEVEL`             | trace, debug, info, warn, error               |
//! | `RUST_LOG`              | full filter syntax, used when no `LOG_LEVEL`  |
//! | `APPGATE_LOG_FORMAT`    | `text` (default) or `json`                    |

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ExApp;
use crate::impls::InMemoryExAppRegistry;
use crate::ports::RegistryError;

pub const REGISTRY_FILE: &str = "APPGATE_REGISTRY_FILE";
pub const AA_VERSION: &str = "APPGATE_AA_VERSION";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const RUST_LOG: &str = "RUST_LOG";
pub const LOG_FORMAT: &str = "APPGATE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("IO error for '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry file '{}': {source}", path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`.
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub registry_file: Option<PathBuf>,
    pub aa_version: String,
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key → value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            registry_file: get(REGISTRY_FILE).map(PathBuf::from),
            aa_version: get(AA_VERSION).unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            logging: LoggingConfig {
                filter: resolve_log_filter(get(LOG_LEVEL), get(RUST_LOG))?,
                format: parse_log_format(get(LOG_FORMAT))?,
            },
        })
    }
}

/// Priority: LOG_LEVEL > RUST_LOG > default (info)
fn resolve_log_filter(
    level: Option<String>,
    rust_log: Option<String>,
) -> Result<String, ConfigError> {
    if let Some(level) = level {
        let level = level.trim().to_lowercase();
        return match level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(level),
            _ => Err(ConfigError::Invalid {
                key: LOG_LEVEL.to_string(),
                message: format!("'{level}', expected: trace, debug, info, warn, error"),
            }),
        };
    }
    Ok(rust_log.unwrap_or_else(|| DEFAULT_FILTER.to_string()))
}

fn parse_log_format(value: Option<String>) -> Result<LogFormat, ConfigError> {
    match value.as_deref().map(str::trim) {
        None => Ok(LogFormat::Text),
        Some(v) if v.eq_ignore_ascii_case("text") => Ok(LogFormat::Text),
        Some(v) if v.eq_ignore_ascii_case("json") => Ok(LogFormat::Json),
        Some(v) => Err(ConfigError::Invalid {
            key: LOG_FORMAT.to_string(),
            message: format!("'{v}', expected: text, json"),
        }),
    }
}

/// Parse a registry document: a JSON array of ExApp records.
pub fn parse_registry(path: &Path, contents: &str) -> Result<InMemoryExAppRegistry, ConfigError> {
    let records: Vec<ExApp> = serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    InMemoryExAppRegistry::from_records(records).map_err(|source| ConfigError::Registry {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_registry(path: &Path) -> Result<InMemoryExAppRegistry, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_registry(path, &contents)
}
