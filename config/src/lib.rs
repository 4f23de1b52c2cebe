//! Configuration for dynacall.
//!
//! ```toml
//! [log]
//! filter = "debug"
//! file = "${HOME}/.dynacall/logs/dynacall.log"
//!
//! [server]
//! endpoints = ["calculator", "text"]
//! max_request_bytes = 65536
//! max_in_flight = 8
//! ```
//!
//! Every section and field is optional; the accessors on [`DynacallConfig`]
//! resolve the defaults.

use dynacall_engine::builtins::BUILTIN_ENDPOINTS;
use dynacall_engine::{DEFAULT_MAX_IN_FLIGHT, DEFAULT_MAX_REQUEST_BYTES};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Default, Deserialize)]
pub struct DynacallConfig {
    pub log: Option<LogConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: Option<String>,
    /// Log file path. Supports `${VAR}` expansion.
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    /// Built-in endpoint names, in dispatch order.
    pub endpoints: Option<Vec<String>>,
    pub max_request_bytes: Option<usize>,
    pub max_in_flight: Option<usize>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Expand `${VAR}` references from the process environment.
///
/// Unset variables expand to the empty string. An unclosed `${` is kept as-is.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl DynacallConfig {
    /// Load from the default location. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Load from an explicit path. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log
            .as_ref()
            .and_then(|log| log.filter.as_deref())
            .map(str::trim)
            .filter(|filter| !filter.is_empty())
            .unwrap_or(DEFAULT_LOG_FILTER)
    }

    #[must_use]
    pub fn log_file(&self) -> Option<PathBuf> {
        let raw = self.log.as_ref()?.file.as_deref()?;
        let expanded = expand_env_vars(raw.trim());
        if expanded.is_empty() {
            return None;
        }
        Some(PathBuf::from(expanded))
    }

    #[must_use]
    pub fn endpoints(&self) -> Vec<String> {
        match self.server.as_ref().and_then(|s| s.endpoints.as_ref()) {
            Some(endpoints) => endpoints.iter().map(|e| e.trim().to_string()).collect(),
            None => BUILTIN_ENDPOINTS.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn max_request_bytes(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.max_request_bytes)
            .unwrap_or(DEFAULT_MAX_REQUEST_BYTES)
    }

    /// Concurrent request cap for the serve loop; never less than 1.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.server
            .as_ref()
            .and_then(|s| s.max_in_flight)
            .unwrap_or(DEFAULT_MAX_IN_FLIGHT)
            .max(1)
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dynacall").join("config.toml"))
}
