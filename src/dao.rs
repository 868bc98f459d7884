//! Row store facade.
//!
//! [`RowStoreDao`] maps each data-access operation onto one store request
//! (two for [`delete_table`](RowStoreDao::delete_table), a scan plus a get for
//! [`scan_column`](RowStoreDao::scan_column)). Every failure is logged where
//! it is observed and returned to the caller.
//!
//! # Basic Usage
//! ```no_run
//! use rowstore::{Families, RowMutation, RowStoreDao, StoreConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> rowstore::Result<()> {
//!     let config = StoreConfig::load(None)?;
//!     let dao = RowStoreDao::connect(&config)?;
//!
//!     let mut families = Families::new();
//!     families.entry("baseInfo".to_string()).or_default();
//!     dao.create_table("Students", families).await?;
//!
//!     let row = RowMutation::new()
//!         .with("baseInfo", "name", "yanghongfei")
//!         .with("baseInfo", "age", "18");
//!     dao.puts_by_rowkey("Students", "rowkey3", &row).await?;
//!
//!     println!("{}", dao.gets("Students", "rowkey3").await?);
//!     Ok(())
//! }
//! ```

use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::proto::CreateTableRequest;
use crate::proto::DeleteRequest;
use crate::proto::Filter;
use crate::proto::GetRequest;
use crate::proto::PutRequest;
use crate::proto::ScanRequest;
use crate::AdminClient;
use crate::Connection;
use crate::Error;
use crate::Families;
use crate::GrpcAdminClient;
use crate::GrpcRowClient;
use crate::Result;
use crate::RowClient;
use crate::RowMutation;
use crate::RowResult;
use crate::StoreConfig;
use crate::TableDescriptor;

/// Data-access facade over one row client and one admin client
pub struct RowStoreDao<R = GrpcRowClient, A = GrpcAdminClient> {
    rows: R,
    admin: A,
}

impl RowStoreDao<GrpcRowClient, GrpcAdminClient> {
    /// Build both handles over one lazily connected channel.
    ///
    /// Only configuration errors are reported here; the store is first
    /// contacted by the first operation.
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        let connection = Connection::from_config(config)?;
        Ok(Self::from_connection(connection))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self {
            rows: GrpcRowClient::new(connection.clone()),
            admin: GrpcAdminClient::new(connection),
        }
    }

    /// Rebuild the shared channel, optionally against a new endpoint
    pub fn reconnect(
        &self,
        new_endpoint: Option<String>,
    ) -> Result<()> {
        // Both handles share the connection, one swap moves them together.
        self.rows.connection().reconnect(new_endpoint)
    }

    pub fn connection(&self) -> &Connection {
        self.rows.connection()
    }
}

impl<R, A> RowStoreDao<R, A>
where
    R: RowClient,
    A: AdminClient,
{
    pub fn new(
        rows: R,
        admin: A,
    ) -> Self {
        Self { rows, admin }
    }

    /// Create `table` with the given column families and their options
    pub async fn create_table(
        &self,
        table: &str,
        families: Families,
    ) -> Result<()> {
        ensure_table_name(table)?;
        let request = CreateTableRequest::from(TableDescriptor::new(table, families));

        match self.admin.create_table(request).await {
            Ok(()) => {
                info!("create {} table ok.", table);
                Ok(())
            }
            Err(e) => {
                error!("create {} table error: {}", table, e);
                Err(e)
            }
        }
    }

    /// Disable then delete `table`.
    ///
    /// The delete is attempted even when the disable fails (e.g. the table
    /// was already disabled); the delete's outcome is returned.
    pub async fn delete_table(
        &self,
        table: &str,
    ) -> Result<()> {
        ensure_table_name(table)?;

        if let Err(e) = self.admin.disable_table(table).await {
            warn!("disable {} table error: {}", table, e);
        }

        match self.admin.delete_table(table).await {
            Ok(()) => {
                info!("delete {} table ok.", table);
                Ok(())
            }
            Err(e) => {
                error!("delete {} table error: {}", table, e);
                Err(e)
            }
        }
    }

    /// Whether a table named `table` exists, by a linear scan of the table
    /// list
    pub async fn exist_table(
        &self,
        table: &str,
    ) -> Result<bool> {
        let table_names = self.admin.list_table_names().await.map_err(|e| {
            error!("list table names error: {}", e);
            e
        })?;

        Ok(table_names.iter().any(|name| name.qualifier == table))
    }

    /// Keys of every row whose key starts with `prefix`, in key order
    pub async fn scan_rows(
        &self,
        table: &str,
        prefix: &str,
    ) -> Result<Vec<String>> {
        ensure_table_name(table)?;
        let request = ScanRequest::new(table).with_filter(Filter::prefix(prefix));

        let rows = self.rows.scan(request).await.map_err(|e| {
            error!("scan {} with prefix {:?} error: {}", table, prefix, e);
            e
        })?;

        let row_keys: Vec<String> = rows
            .iter()
            .filter_map(RowResult::row_key)
            .map(|row_key| String::from_utf8_lossy(row_key).into_owned())
            .collect();

        debug!("scan {} with prefix {:?}: {} rows", table, prefix, row_keys.len());
        Ok(row_keys)
    }

    /// The full row holding the first cell whose qualifier starts with
    /// `column` and whose value equals `value`.
    ///
    /// Stops at the first match. `None` when no cell matches.
    pub async fn scan_column(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> Result<Option<RowResult>> {
        ensure_table_name(table)?;
        let request = ScanRequest::new(table).with_filter(Filter::column_prefix(column));

        let rows = self.rows.scan(request).await.map_err(|e| {
            error!("scan {} column {:?} error: {}", table, column, e);
            e
        })?;

        let matched = rows
            .iter()
            .flat_map(RowResult::cells)
            .find(|cell| cell.value.as_ref() == value.as_bytes());

        match matched {
            Some(cell) => {
                debug!(
                    "scan {} column {:?}: match in row {:?}",
                    table,
                    column,
                    String::from_utf8_lossy(&cell.row)
                );
                self.get_row(table, &cell.row, GetRequest::new(table, &cell.row))
                    .await
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Add or overwrite the cells of `mutation` in row `row_key`
    pub async fn puts_by_rowkey(
        &self,
        table: &str,
        row_key: &str,
        mutation: &RowMutation,
    ) -> Result<()> {
        ensure_table_name(table)?;
        if mutation.cell_count() == 0 {
            return Err(Error::InvalidRequest(format!(
                "put on {table}/{row_key} has no cells"
            )));
        }

        let request = PutRequest::new(table, row_key, mutation);
        self.rows.put(request).await.map_err(|e| {
            error!("put {}/{} error: {}", table, row_key, e);
            e
        })
    }

    /// Every cell of row `row_key`.
    ///
    /// # Errors
    /// - [`Error::NoSuchRowKeyOrQualifier`] if the row has no cells
    /// - [`Error::TableNotFound`] if the table does not exist
    pub async fn gets(
        &self,
        table: &str,
        row_key: &str,
    ) -> Result<RowResult> {
        ensure_table_name(table)?;
        self.get_row(table, row_key.as_bytes(), GetRequest::new(table, row_key))
            .await
    }

    /// The cells of row `row_key` selected by `columns` (families and
    /// qualifiers; values ignored, a family with no qualifiers selects the
    /// whole family).
    ///
    /// # Errors
    /// - [`Error::NoSuchColumnFamily`] if a selected family is not in the
    ///   table schema
    /// - [`Error::NoSuchRowKeyOrQualifier`] if none of the selected cells exist
    pub async fn gets_columns(
        &self,
        table: &str,
        row_key: &str,
        columns: &RowMutation,
    ) -> Result<RowResult> {
        ensure_table_name(table)?;
        let request = GetRequest::new(table, row_key).with_columns(columns);
        self.get_row(table, row_key.as_bytes(), request).await
    }

    /// Whether row `row_key` has at least one cell
    pub async fn exist(
        &self,
        table: &str,
        row_key: &str,
    ) -> Result<bool> {
        ensure_table_name(table)?;
        match self.rows.get(GetRequest::new(table, row_key)).await {
            Ok(result) => Ok(!result.is_empty()),
            Err(e) => {
                error!("get {}/{} error: {}", table, row_key, e);
                Err(e)
            }
        }
    }

    /// Delete the cells of row `row_key` selected by `mutation` (values
    /// ignored). An empty mutation deletes the whole row.
    pub async fn delete_by_rowkey(
        &self,
        table: &str,
        row_key: &str,
        mutation: &RowMutation,
    ) -> Result<()> {
        ensure_table_name(table)?;
        let request = DeleteRequest::new(table, row_key, mutation);
        self.rows.delete(request).await.map_err(|e| {
            error!("delete {}/{} error: {}", table, row_key, e);
            e
        })
    }

    async fn get_row(
        &self,
        table: &str,
        row_key: &[u8],
        request: GetRequest,
    ) -> Result<RowResult> {
        let result = self.rows.get(request).await.map_err(|e| {
            error!("get {}/{} error: {}", table, String::from_utf8_lossy(row_key), e);
            e
        })?;

        if result.is_empty() {
            warn!("get {}/{}: no cells", table, String::from_utf8_lossy(row_key));
            return Err(Error::NoSuchRowKeyOrQualifier {
                table: table.to_string(),
                row_key: String::from_utf8_lossy(row_key).into_owned(),
            });
        }

        Ok(result)
    }
}

fn ensure_table_name(table: &str) -> Result<()> {
    if table.is_empty() {
        return Err(Error::InvalidRequest("table name must not be empty".to_string()));
    }
    Ok(())
}
