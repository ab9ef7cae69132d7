//! Service configuration.
//!
//! # Environment Variables
//!
//! - `TASKS_FILE`: backing file (default: `tasks.txt`)
//! - `HOST`: bind address (default: `0.0.0.0`)
//! - `PORT`: bind port (default: `8000`)
//! - `TASK_ID_STRATEGY`: `count` (default) | `max`
//! - `WRITE_MODE`: `overwrite` (default) | `atomic`
//! - `WORKER_THREADS`: tokio worker threads (default: logical CPU count)
//! - `LOG_FORMAT`: `text` (default) | `json`

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use super::repository::{IdStrategy, WriteMode};

const DEFAULT_TASKS_FILE: &str = "tasks.txt";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

// =============================================================================
// Configuration Error
// =============================================================================

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `TASK_ID_STRATEGY` has an unknown value.
    #[error("Invalid TASK_ID_STRATEGY: {0} (expected 'count' or 'max')")]
    InvalidIdStrategy(String),

    /// `WRITE_MODE` has an unknown value.
    #[error("Invalid WRITE_MODE: {0} (expected 'overwrite' or 'atomic')")]
    InvalidWriteMode(String),

    /// `LOG_FORMAT` has an unknown value.
    #[error("Invalid LOG_FORMAT: {0} (expected 'text' or 'json')")]
    InvalidLogFormat(String),

    /// `PORT` is not a valid port number.
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    /// `WORKER_THREADS` is not a positive integer.
    #[error("Invalid WORKER_THREADS: {0} (expected a positive integer)")]
    InvalidWorkerThreads(String),

    /// `HOST` and `PORT` do not form a socket address.
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    /// A variable is set but not valid UTF-8.
    #[error("{0} is not valid UTF-8")]
    NotUnicode(String),
}

// =============================================================================
// Enumerated Settings
// =============================================================================

impl FromStr for IdStrategy {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "max" | "next_after_max" => Ok(Self::NextAfterMax),
            _ => Err(ConfigurationError::InvalidIdStrategy(value.to_string())),
        }
    }
}

impl FromStr for WriteMode {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "overwrite" => Ok(Self::Overwrite),
            "atomic" | "rename" => Ok(Self::Atomic),
            _ => Err(ConfigurationError::InvalidWriteMode(value.to_string())),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigurationError::InvalidLogFormat(value.to_string())),
        }
    }
}

// =============================================================================
// Service Configuration
// =============================================================================

/// Runtime configuration of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Line-delimited JSON file mirroring the store.
    pub tasks_file: PathBuf,
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// How new task ids are chosen.
    pub id_strategy: IdStrategy,
    /// How the backing file is rewritten.
    pub write_mode: WriteMode,
    /// Tokio worker threads; `None` uses the runtime default.
    pub worker_threads: Option<usize>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            id_strategy: IdStrategy::default(),
            write_mode: WriteMode::default(),
            worker_threads: None,
            log_format: LogFormat::default(),
        }
    }
}

impl ServiceConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let mut not_unicode = None;
        let config = Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                not_unicode.get_or_insert_with(|| key.to_string());
                None
            }
        });

        match not_unicode {
            Some(key) => Err(ConfigurationError::NotUnicode(key)),
            None => config,
        }
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset and blank values fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if any variable holds an invalid value.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigurationError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let defaults = Self::default();

        let tasks_file = value("TASKS_FILE").map_or(defaults.tasks_file, PathBuf::from);
        let host = value("HOST").unwrap_or(defaults.host);
        let port = value("PORT")
            .map(|raw| {
                raw.parse::<u16>()
                    .map_err(|_| ConfigurationError::InvalidPort(raw))
            })
            .transpose()?
            .unwrap_or(defaults.port);
        let id_strategy = value("TASK_ID_STRATEGY")
            .map(|raw| raw.parse::<IdStrategy>())
            .transpose()?
            .unwrap_or(defaults.id_strategy);
        let write_mode = value("WRITE_MODE")
            .map(|raw| raw.parse::<WriteMode>())
            .transpose()?
            .unwrap_or(defaults.write_mode);
        let worker_threads = value("WORKER_THREADS")
            .map(|raw| parse_worker_threads(&raw))
            .transpose()?;
        let log_format = value("LOG_FORMAT")
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()?
            .unwrap_or(defaults.log_format);

        Ok(Self {
            tasks_file,
            host,
            port,
            id_strategy,
            write_mode,
            worker_threads,
            log_format,
        })
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidAddress`] if `host` and `port` do
    /// not parse as a socket address.
    pub fn socket_address(&self) -> Result<SocketAddr, ConfigurationError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|_| ConfigurationError::InvalidAddress(address))
    }
}

fn parse_worker_threads(raw: &str) -> Result<usize, ConfigurationError> {
    match raw.parse::<usize>() {
        Ok(threads) if threads > 0 => Ok(threads),
        _ => Err(ConfigurationError::InvalidWorkerThreads(raw.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================
