//! Store client handles
//!
//! - [`Connection`] - Shared, lazily connected channel to the store
//! - [`ConnectionBuilder`] - Configurable connection construction
//! - [`RowClient`] / [`GrpcRowClient`] - Row reads, writes and scans
//! - [`AdminClient`] / [`GrpcAdminClient`] - Table administration
//!
//! # Basic Usage
//! ```no_run
//! use rowstore::{Connection, GrpcAdminClient, GrpcRowClient};
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let connection = Connection::builder("http://hbase-gw:9090")
//!         .effective_user("webapi")
//!         .request_timeout(Duration::from_secs(5))
//!         .build()
//!         .unwrap();
//!
//!     let rows = GrpcRowClient::new(connection.clone());
//!     let admin = GrpcAdminClient::new(connection);
//! }
//! ```

mod admin;
mod builder;
mod connection;
mod rows;

pub use admin::*;
pub use builder::*;
pub use connection::*;
pub use rows::*;


#[cfg(test)]
use mockall::automock;
use tonic::async_trait;

use crate::proto::CreateTableRequest;
use crate::proto::DeleteRequest;
use crate::proto::GetRequest;
use crate::proto::PutRequest;
use crate::proto::ScanRequest;
use crate::proto::TableName;
use crate::Result;
use crate::RowResult;

/// Row level operations against one store.
///
/// Store statuses are classified into [`crate::Error`] variants by the
/// implementation; callers never see raw transport types.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RowClient: Send + Sync + 'static {
    /// Fetch the cells of one row. An absent row yields an empty result.
    async fn get(
        &self,
        request: GetRequest,
    ) -> Result<RowResult>;

    async fn put(
        &self,
        request: PutRequest,
    ) -> Result<()>;

    async fn delete(
        &self,
        request: DeleteRequest,
    ) -> Result<()>;

    /// Run a scan to completion. Rows are returned in key order, fully
    /// materialized.
    async fn scan(
        &self,
        request: ScanRequest,
    ) -> Result<Vec<RowResult>>;
}

/// Schema operations against one store
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AdminClient: Send + Sync + 'static {
    async fn create_table(
        &self,
        request: CreateTableRequest,
    ) -> Result<()>;

    async fn disable_table(
        &self,
        table: &str,
    ) -> Result<()>;

    async fn delete_table(
        &self,
        table: &str,
    ) -> Result<()>;

    async fn list_table_names(&self) -> Result<Vec<TableName>>;
}
