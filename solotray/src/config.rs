use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::{
    Result, SolotrayError, DEFAULT_CONNECT_TIMEOUT, DEFAULT_COORDINATION_ADDR,
    DEFAULT_READ_TIMEOUT, DEFAULT_TITLE,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Runtime configuration of a solotray process.
///
/// Every field has a default, so an empty TOML document is a valid configuration.
///
/// ```toml
/// address = "127.0.0.1:12345"
/// read_timeout = 2000
/// connect_timeout = 1000
/// title = "Micman 2"
/// exit_marker_dir = "."
/// write_exit_marker = true
/// ```
#[derive(Debug, Clone, Deserialize, TypedBuilder)]
#[serde(default)]
pub struct Config {
    /// The coordination address. Must be a loop-back address.
    #[builder(default = DEFAULT_COORDINATION_ADDR)]
    pub address: SocketAddr,

    /// Milliseconds a decode task waits for a follower's payload.
    #[builder(default = DEFAULT_READ_TIMEOUT)]
    pub read_timeout: u64,

    /// Milliseconds a follower waits to connect to the leader.
    #[builder(default = DEFAULT_CONNECT_TIMEOUT)]
    pub connect_timeout: u64,

    /// The title shown by the presentation layer.
    #[builder(default = DEFAULT_TITLE.to_string(), setter(into))]
    pub title: String,

    /// Directory the on-exit marker file is written to.
    #[builder(default = PathBuf::from("."), setter(into))]
    pub exit_marker_dir: PathBuf,

    /// Whether to write the on-exit marker file at all.
    #[builder(default = true)]
    pub write_exit_marker: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Config {
    /// Loads the configuration from a TOML file, or the defaults if no path is given.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = match path {
            Some(path) => {
                let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
                    SolotrayError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                toml::from_str(&contents)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        if !self.address.ip().is_loopback() {
            return Err(SolotrayError::Config(format!(
                "coordination address {} is not a loop-back address",
                self.address
            )));
        }

        Ok(())
    }

    /// Returns the read timeout as a `Duration`.
    pub fn get_read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout)
    }

    /// Returns the connect timeout as a `Duration`.
    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout)
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
