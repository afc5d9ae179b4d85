//! Configuration loading.
//!
//! Defaults, then an optional `callboard.toml` (or an explicit `--config`
//! path), then `CALLBOARD_*` environment overrides. Everything here is fixed
//! for the lifetime of the process.

use serde::{Deserialize, Serialize};
use showgraph::MockParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOCAL_CONFIG: &str = "callboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CallboardConfig {
    pub bind: BindConfig,
    pub telemetry: TelemetryConfig,
    pub show: ShowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Listen address for the HTTP server.
    pub addr: String,
}

impl Default for BindConfig {
    fn default() -> Self {
        BindConfig {
            addr: "127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default log filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShowConfig {
    /// Show file to load at startup. Takes precedence over `mock`.
    pub path: Option<PathBuf>,
    /// Generate a mock show instead of loading one; the embedded demo show
    /// is used when neither `path` nor `mock` is set.
    pub mock: Option<MockParams>,
}

impl CallboardConfig {
    /// Load configuration. An explicit path must exist; the local
    /// `callboard.toml` is optional.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let local = Path::new(LOCAL_CONFIG);
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    CallboardConfig::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(addr) = std::env::var("CALLBOARD_ADDR") {
            self.bind.addr = addr;
        }
        if let Ok(level) = std::env::var("CALLBOARD_LOG_LEVEL") {
            self.telemetry.log_level = level;
        }
        if let Ok(path) = std::env::var("CALLBOARD_SHOW_PATH") {
            self.show.path = Some(PathBuf::from(path));
        }
    }
}
