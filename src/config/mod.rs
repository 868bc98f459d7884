//! Store connection configuration.
//!
//! Sources, lowest priority first:
//! 1. Default values (hardcoded)
//! 2. `config/rowstore.{toml,...}` if present
//! 3. The file named by `path`, or by the `CONFIG_PATH` environment variable
//! 4. Environment variables prefixed with `ROWSTORE__` (highest priority)
//!
//! The legacy keys `hbasehost` and `userName` are accepted for the endpoint
//! and the effective user.

mod network;
pub use network::*;


//---
use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreConfig {
    /// Store RPC endpoint, e.g. `http://hbase-gw:9090`
    #[serde(default = "default_endpoint", alias = "hbasehost")]
    pub endpoint: String,

    /// Identity the store executes every request as
    #[serde(default = "default_effective_user", alias = "userName", alias = "username")]
    pub effective_user: String,

    /// Channel tuning
    #[serde(default)]
    pub network: ConnectionParams,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            effective_user: default_effective_user(),
            network: ConnectionParams::default(),
        }
    }
}

impl StoreConfig {
    /// Load and validate the configuration.
    ///
    /// # Arguments
    /// * `path` - Optional config file; takes precedence over `CONFIG_PATH`
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(File::with_name("config/rowstore").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if let Ok(path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("ROWSTORE")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_endpoint(&self.endpoint)?;
        validate_effective_user(&self.effective_user)?;
        self.network.validate()
    }
}

/// The store is reached over gRPC, so only `http://` and `https://`
/// endpoints are usable.
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.trim().is_empty() {
        return Err(Error::Config(ConfigError::Message("endpoint must not be empty".to_string())));
    }
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(Error::Config(ConfigError::Message(format!(
            "endpoint {endpoint} must start with http:// or https://"
        ))));
    }
    Ok(())
}

/// The user travels as an ASCII metadata value, so it must be printable
/// ASCII.
pub(crate) fn validate_effective_user(user: &str) -> Result<()> {
    if user.trim().is_empty() {
        return Err(Error::Config(ConfigError::Message(
            "effective user must not be empty".to_string(),
        )));
    }
    if !user.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
        return Err(Error::InvalidRequest(format!(
            "effective user {user:?} must be printable ASCII"
        )));
    }
    Ok(())
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9090".to_string()
}
fn default_effective_user() -> String {
    "hbase".to_string()
}
