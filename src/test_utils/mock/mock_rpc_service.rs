use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tonic::codec::CompressionEncoding;
use tracing::debug;

use super::MemStoreService;
use crate::proto::admin_service_server::AdminServiceServer;
use crate::proto::row_service_server::RowServiceServer;
use crate::Connection;
use crate::RowStoreDao;

pub(crate) struct MockNode;

impl MockNode {
    /// Serve `service` on an ephemeral local port until `rx` fires or is
    /// dropped.
    pub(crate) async fn mock_listener(
        service: Arc<MemStoreService>,
        rx: oneshot::Receiver<()>,
    ) -> (u16, SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let port = addr.port();
        debug!("starting mem store service:port={port}");

        tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(
                    RowServiceServer::from_arc(service.clone())
                        .accept_compressed(CompressionEncoding::Gzip)
                        .send_compressed(CompressionEncoding::Gzip),
                )
                .add_service(
                    AdminServiceServer::from_arc(service)
                        .accept_compressed(CompressionEncoding::Gzip)
                        .send_compressed(CompressionEncoding::Gzip),
                )
                .serve_with_incoming_shutdown(tokio_stream::wrappers::TcpListenerStream::new(listener), async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        (port, addr)
    }

    pub(crate) fn endpoint(port: u16) -> String {
        format!("http://127.0.0.1:{port}")
    }

    /// Start an empty in-memory store and connect a facade to it as
    /// `effective_user`.
    pub(crate) async fn simulate_mem_store(
        rx: oneshot::Receiver<()>,
        effective_user: &str,
    ) -> (Arc<MemStoreService>, RowStoreDao) {
        let service = Arc::new(MemStoreService::default());
        let (port, _addr) = Self::mock_listener(service.clone(), rx).await;

        let connection = Connection::builder(Self::endpoint(port))
            .effective_user(effective_user)
            .build()
            .expect("valid connection");

        (service, RowStoreDao::from_connection(connection))
    }
}
