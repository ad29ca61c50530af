//! Daemon configuration.
//!
//! Configuration is stored as TOML. The path comes from the
//! `FILEBAY_CONFIG` environment variable, falling back to
//! `./filebay.toml`; a missing file yields the defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// TCP port the WebSocket server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Directory tree served to clients.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Seconds between idle-transfer sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Seconds of inactivity after which a transfer handle is evicted.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_listen_port() -> u16 {
    9330
}

fn default_root_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
    PathBuf::from(home).join(".local").join("share").join("filebay")
}

fn default_sweep_interval_secs() -> u64 {
    30
}

fn default_idle_timeout_secs() -> u64 {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            root_dir: default_root_dir(),
            sweep_interval_secs: default_sweep_interval_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or returns the defaults if the
    /// file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }
}

/// Returns the configuration file path.
fn config_path() -> PathBuf {
    std::env::var("FILEBAY_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("filebay.toml"))
}
