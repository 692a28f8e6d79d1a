//! Tool configuration.
//!
//! Values are resolved in layers: built-in defaults, then an optional TOML
//! file, then `SESSIONLIST_*` environment variables. Command line flags are
//! applied on top by the individual commands.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default port a session is announced on.
pub const DEFAULT_PORT: u16 = 27750;

/// Default protocol version string.
pub const DEFAULT_PROTOCOL: &str = "dp:4.20.1";

/// Lease length assumed when the server does not advertise one.
pub const DEFAULT_LEASE_MINUTES: i64 = 10;

/// Extra seconds added to every refresh wait so the refresh lands before
/// the lease runs out.
pub const DEFAULT_REFRESH_MARGIN_SECS: u64 = 30;

const CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = "sessionlist";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub announce: AnnounceDefaults,
    pub lifecycle: LifecycleConfig,
    pub http: HttpConfig,
}

/// Values used to fill in a new announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnounceDefaults {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub owner: String,
    pub title: String,
}

impl Default for AnnounceDefaults {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            protocol: DEFAULT_PROTOCOL.to_string(),
            owner: "tester".to_string(),
            title: "Test: ".to_string(),
        }
    }
}

/// Timing and failure policy for the announcement keep-alive loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    pub default_lease_minutes: i64,
    pub refresh_margin_secs: u64,
    /// Lower bound on the wait between refreshes.
    pub min_refresh_secs: u64,
    /// Try one unlist after a refresh fails instead of leaving the listing
    /// to expire on its own.
    pub unlist_on_refresh_failure: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_lease_minutes: DEFAULT_LEASE_MINUTES,
            refresh_margin_secs: DEFAULT_REFRESH_MARGIN_SECS,
            min_refresh_secs: DEFAULT_REFRESH_MARGIN_SECS,
            unlist_on_refresh_failure: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            user_agent: format!("sessionlist/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Resolve the configuration.
    ///
    /// An explicit `path` must exist. Without one, the user config file is
    /// read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid config TOML")
    }

    /// Apply `SESSIONLIST_*` overrides using `lookup` to read variables.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SESSIONLIST_HOST") {
            self.announce.host = host;
        }
        if let Some(port) = lookup("SESSIONLIST_PORT") {
            self.announce.port = port
                .parse()
                .with_context(|| format!("SESSIONLIST_PORT is not a valid port: {port}"))?;
        }
        if let Some(protocol) = lookup("SESSIONLIST_PROTOCOL") {
            self.announce.protocol = protocol;
        }
        if let Some(owner) = lookup("SESSIONLIST_OWNER") {
            self.announce.owner = owner;
        }
        if let Some(timeout) = lookup("SESSIONLIST_TIMEOUT_SECS") {
            self.http.timeout_secs = timeout.parse().with_context(|| {
                format!("SESSIONLIST_TIMEOUT_SECS is not a number: {timeout}")
            })?;
        }
        Ok(self)
    }
}

/// `$XDG_CONFIG_HOME/sessionlist/config.toml` or the platform equivalent.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
