use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tonic::codec::CompressionEncoding;
use tonic::metadata::AsciiMetadataValue;
use tonic::transport::Channel;
use tonic::transport::Endpoint;
use tracing::debug;
use tracing::info;

use super::ConnectionBuilder;
use crate::config::validate_effective_user;
use crate::config::validate_endpoint;
use crate::constants::EFFECTIVE_USER_METADATA_KEY;
use crate::proto::admin_service_client::AdminServiceClient;
use crate::proto::row_service_client::RowServiceClient;
use crate::ConnectionParams;
use crate::NetworkError;
use crate::Result;
use crate::StoreConfig;

/// Shared handle to the store.
///
/// Cloning is cheap and every clone observes the same channel, so a row
/// client and an admin client built from one `Connection` are swapped
/// together by [`reconnect`](Connection::reconnect).
///
/// The channel connects lazily: building a `Connection` performs no network
/// I/O, and connectivity errors surface on the first request. Must be created
/// inside a Tokio runtime.
#[derive(Clone)]
pub struct Connection {
    pub(super) inner: Arc<ArcSwap<ConnectionInner>>,
}

pub struct ConnectionInner {
    pub(super) channel: Channel,
    pub(super) endpoint: String,
    pub(super) effective_user: String,
    pub(super) user_metadata: AsciiMetadataValue,
    pub(super) params: ConnectionParams,
}

impl Connection {
    /// Create a configured connection builder
    pub fn builder(endpoint: impl Into<String>) -> ConnectionBuilder {
        ConnectionBuilder::new(endpoint)
    }

    /// Build a connection from loaded configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        Self::create(
            config.endpoint.clone(),
            config.effective_user.clone(),
            config.network.clone(),
        )
    }

    pub(crate) fn create(
        endpoint: String,
        effective_user: String,
        params: ConnectionParams,
    ) -> Result<Self> {
        let inner = ConnectionInner::new(endpoint, effective_user, params)?;
        info!(
            "store connection created: endpoint={}, effective_user={}",
            inner.endpoint, inner.effective_user
        );
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(inner)),
        })
    }

    /// Rebuild the channel, optionally against a new endpoint.
    ///
    /// Calls already in flight complete on the old channel.
    pub fn reconnect(
        &self,
        new_endpoint: Option<String>,
    ) -> Result<()> {
        let old_inner = self.inner.load();
        let endpoint = new_endpoint.unwrap_or_else(|| old_inner.endpoint.clone());

        let new_inner = ConnectionInner::new(endpoint, old_inner.effective_user.clone(), old_inner.params.clone())?;
        info!("store connection rebuilt: endpoint={}", new_inner.endpoint);

        self.inner.store(Arc::new(new_inner));
        Ok(())
    }

    pub fn endpoint(&self) -> String {
        self.inner.load().endpoint.clone()
    }

    pub fn effective_user(&self) -> String {
        self.inner.load().effective_user.clone()
    }

    /// Wrap a message, tagging it with the effective user
    pub(crate) fn request<T>(
        &self,
        message: T,
    ) -> tonic::Request<T> {
        let inner = self.inner.load();
        let mut request = tonic::Request::new(message);
        request
            .metadata_mut()
            .insert(EFFECTIVE_USER_METADATA_KEY, inner.user_metadata.clone());
        request
    }

    pub(crate) fn row_service(&self) -> RowServiceClient<Channel> {
        let inner = self.inner.load();
        let mut client = RowServiceClient::new(inner.channel.clone());
        if inner.params.enable_compression {
            client = client
                .send_compressed(CompressionEncoding::Gzip)
                .accept_compressed(CompressionEncoding::Gzip);
        }
        client
    }

    pub(crate) fn admin_service(&self) -> AdminServiceClient<Channel> {
        let inner = self.inner.load();
        let mut client = AdminServiceClient::new(inner.channel.clone());
        if inner.params.enable_compression {
            client = client
                .send_compressed(CompressionEncoding::Gzip)
                .accept_compressed(CompressionEncoding::Gzip);
        }
        client
    }
}

impl ConnectionInner {
    fn new(
        endpoint: String,
        effective_user: String,
        params: ConnectionParams,
    ) -> Result<Self> {
        // `AsciiMetadataValue` keeps non-ASCII bytes as-is; reject them here.
        validate_effective_user(&effective_user)?;
        let user_metadata = AsciiMetadataValue::try_from(effective_user.as_str())
            .map_err(|_| crate::Error::InvalidRequest(format!("effective user {effective_user:?} is not ASCII")))?;
        let channel = Self::create_channel(&endpoint, &params)?;

        Ok(Self {
            channel,
            endpoint,
            effective_user,
            user_metadata,
            params,
        })
    }

    fn create_channel(
        endpoint: &str,
        params: &ConnectionParams,
    ) -> Result<Channel> {
        debug!("create_channel, endpoint = {:?}", endpoint);
        let endpoint_builder =
            Endpoint::from_shared(endpoint.to_string()).map_err(|_| NetworkError::InvalidURI(endpoint.to_string()))?;
        validate_endpoint(endpoint)?;

        let channel = endpoint_builder
            .connect_timeout(params.connect_timeout())
            .timeout(params.request_timeout())
            .tcp_keepalive(Some(Duration::from_secs(params.tcp_keepalive_in_secs)))
            .http2_keep_alive_interval(Duration::from_secs(params.http2_keep_alive_interval_in_secs))
            .keep_alive_timeout(Duration::from_secs(params.http2_keep_alive_timeout_in_secs))
            .connect_lazy();
        Ok(channel)
    }
}
