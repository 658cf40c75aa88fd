use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Delay injected per request by the concurrent strategy unless overridden.
pub const DEFAULT_CONCURRENT_DELAY_MS: u64 = 1000;

/// How accepted connections are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Each connection is handled to completion before the next accept.
    Sequential,
    /// Each connection runs in its own task; the accept loop never waits.
    #[default]
    Concurrent,
}

impl Strategy {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sequential" => Some(Strategy::Sequential),
            "concurrent" => Some(Strategy::Concurrent),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0} is not a valid directory")]
    InvalidRoot(PathBuf),
    #[error("invalid listen address {0:?}")]
    InvalidListenAddr(String),
    #[error("backlog must be greater than zero")]
    ZeroBacklog,
    #[error("read buffer size must be greater than zero")]
    ZeroReadBuffer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub backlog: u32,
    pub strategy: Strategy,
    /// Artificial per-request delay; `None` picks the strategy default.
    pub request_delay_ms: Option<u64>,
    /// Size of the single read that must hold the whole request.
    pub read_buffer_size: usize,
    /// Whether file serves are counted; `None` picks the strategy default.
    pub count_requests: Option<bool>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            backlog: 128,
            strategy: Strategy::default(),
            request_delay_ms: None,
            read_buffer_size: 4096,
            count_requests: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

impl Config {
    /// [`Config::from_lookup`] over the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for `LISTEN`,
    /// `SERVE_ROOT`, `STRATEGY` and `REQUEST_DELAY_MS`. Unparseable values
    /// are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Some(root) = lookup("SERVE_ROOT") {
            cfg.static_files.root = PathBuf::from(root);
        }
        if let Some(name) = lookup("STRATEGY") {
            match Strategy::from_name(&name) {
                Some(strategy) => cfg.server.strategy = strategy,
                None => tracing::warn!(value = %name, "Ignoring unknown STRATEGY"),
            }
        }
        if let Some(raw) = lookup("REQUEST_DELAY_MS") {
            match raw.parse() {
                Ok(ms) => cfg.server.request_delay_ms = Some(ms),
                Err(_) => tracing::warn!(value = %raw, "Ignoring non-numeric REQUEST_DELAY_MS"),
            }
        }

        cfg
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Checks everything that must hold before a socket is bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.static_files.root.is_dir() {
            return Err(ConfigError::InvalidRoot(self.static_files.root.clone()));
        }
        self.listen_addr()?;
        if self.server.backlog == 0 {
            return Err(ConfigError::ZeroBacklog);
        }
        if self.server.read_buffer_size == 0 {
            return Err(ConfigError::ZeroReadBuffer);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.server.listen_addr.clone()))
    }

    pub fn request_delay(&self) -> Duration {
        let ms = self
            .server
            .request_delay_ms
            .unwrap_or(match self.server.strategy {
                Strategy::Sequential => 0,
                Strategy::Concurrent => DEFAULT_CONCURRENT_DELAY_MS,
            });
        Duration::from_millis(ms)
    }

    pub fn count_requests(&self) -> bool {
        self.server
            .count_requests
            .unwrap_or(self.server.strategy == Strategy::Concurrent)
    }
}
