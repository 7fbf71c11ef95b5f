//! Configuration file handling.
//!
//! Loads configuration from `~/.config/trashgang/config.toml` or a custom path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ascii::{CELL_ASPECT, DEFAULT_WIDTH};
use crate::chat::{DEFAULT_BUS_CAPACITY, DEFAULT_INBOX_CAPACITY};
use crate::source::{DEFAULT_USER_AGENT, FETCH_TIMEOUT, MAX_IMAGE_BYTES};

/// Configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[chat]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChatConfig {
    /// Messages each participant can have queued before new ones are dropped.
    pub inbox_capacity: usize,
    /// Messages the broadcast bus buffers ahead of the dispatcher.
    pub bus_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in columns when none is requested.
    pub width: u32,
    /// Row/column correction for character cells (height of output rows
    /// relative to width).
    pub cell_aspect: f32,
    /// Ramp used when a request doesn't supply one, darkest first.
    pub charset: Option<String>,
    /// Hard cap on fetched image size, local or remote.
    pub max_bytes: u64,
    /// Overall timeout for remote fetches.
    pub timeout_secs: u64,
    /// `User-Agent` sent with remote fetches.
    pub user_agent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            cell_aspect: CELL_ASPECT,
            charset: None,
            max_bytes: MAX_IMAGE_BYTES,
            timeout_secs: FETCH_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_path(path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            Self::parse(&content).map_err(|e| ConfigError::Parse { path, source: e })
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("trashgang").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/trashgang/config.toml")
        })
}

/// `path` if given, otherwise [`default_path`].
pub fn resolve_path(path: Option<&Path>) -> PathBuf {
    path.map(PathBuf::from).unwrap_or_else(default_path)
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# trashgang configuration

[chat]
# Messages a participant can have queued before new ones are dropped
inbox_capacity = 256
# Messages buffered ahead of the broadcast dispatcher
bus_capacity = 256

[render]
# Default output width in columns (8-400)
width = 80
# Character cell correction (rows per column)
cell_aspect = 0.5
# Ramp from darkest to lightest
# charset = "@%#*+=-:. "
# Maximum image size in bytes (15 MiB)
max_bytes = 15728640
# Remote fetch timeout in seconds
timeout_secs = 12
"#;
