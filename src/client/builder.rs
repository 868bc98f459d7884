use std::time::Duration;

use super::Connection;
use crate::ConnectionParams;
use crate::Result;

pub struct ConnectionBuilder {
    endpoint: String,
    effective_user: String,
    params: ConnectionParams,
}

impl ConnectionBuilder {
    /// Create a new builder with default parameters for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            effective_user: crate::StoreConfig::default().effective_user,
            params: ConnectionParams::default(),
        }
    }

    /// Identity the store executes requests as (default: `hbase`)
    pub fn effective_user(
        mut self,
        user: impl Into<String>,
    ) -> Self {
        self.effective_user = user.into();
        self
    }

    /// Set connection timeout (default: 1s)
    pub fn connect_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.params.connect_timeout_in_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set request timeout (default: 3s)
    pub fn request_timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.params.request_timeout_in_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enable/disable compression (default: enabled)
    pub fn enable_compression(
        mut self,
        enable: bool,
    ) -> Self {
        self.params.enable_compression = enable;
        self
    }

    /// Replaces every channel parameter set so far
    pub fn set_params(
        mut self,
        params: ConnectionParams,
    ) -> Self {
        self.params = params;
        self
    }

    /// Build the connection with current configuration
    pub fn build(self) -> Result<Connection> {
        self.params.validate()?;
        Connection::create(self.endpoint, self.effective_user, self.params)
    }
}
