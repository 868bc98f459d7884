use std::collections::BTreeMap;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use parking_lot::Mutex;
use parking_lot::RwLock;
use tokio_stream::Stream;
use tonic::Request;
use tonic::Response;
use tonic::Status;
use tracing::trace;

use crate::constants::DEFAULT_NAMESPACE;
use crate::constants::EFFECTIVE_USER_METADATA_KEY;
use crate::constants::NO_SUCH_COLUMN_FAMILY;
use crate::constants::TABLE_EXISTS;
use crate::constants::TABLE_NOT_DISABLED;
use crate::constants::TABLE_NOT_ENABLED;
use crate::constants::TABLE_NOT_FOUND;
use crate::proto::admin_service_server::AdminService;
use crate::proto::filter;
use crate::proto::row_service_server::RowService;
use crate::proto::Cell;
use crate::proto::Column;
use crate::proto::CreateTableRequest;
use crate::proto::CreateTableResponse;
use crate::proto::DeleteRequest;
use crate::proto::DeleteResponse;
use crate::proto::DeleteTableRequest;
use crate::proto::DeleteTableResponse;
use crate::proto::DisableTableRequest;
use crate::proto::DisableTableResponse;
use crate::proto::GetRequest;
use crate::proto::GetResponse;
use crate::proto::ListTableNamesRequest;
use crate::proto::ListTableNamesResponse;
use crate::proto::PutRequest;
use crate::proto::PutResponse;
use crate::proto::ScanRequest;
use crate::proto::ScanResponse;
use crate::proto::TableName;

/// qualifier cells of one row: (family, qualifier) -> (value, timestamp)
type MemRow = BTreeMap<(String, String), (Vec<u8>, u64)>;

#[derive(Debug, Default)]
struct MemTable {
    families: BTreeMap<String, HashMap<String, String>>,
    enabled: bool,
    rows: BTreeMap<Vec<u8>, MemRow>,
}

impl MemTable {
    fn ensure_families<'a>(
        &self,
        families: impl IntoIterator<Item = &'a String>,
    ) -> Result<(), Status> {
        for family in families {
            if !self.families.contains_key(family) {
                return Err(Status::not_found(format!("{NO_SUCH_COLUMN_FAMILY}: {family}")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct MemStoreService {
    tables: RwLock<BTreeMap<String, MemTable>>,
    clock: AtomicU64,
    users: Mutex<Vec<String>>,
    fail_with: Mutex<Option<Status>>,
}

impl MemStoreService {
    /// Effective users seen on incoming requests, in arrival order
    pub(crate) fn seen_users(&self) -> Vec<String> {
        self.users.lock().clone()
    }

    /// Every following request fails with `status`
    pub(crate) fn fail_with(
        &self,
        status: Status,
    ) {
        *self.fail_with.lock() = Some(status);
    }

    pub(crate) fn table_families(
        &self,
        table: &str,
    ) -> Option<BTreeMap<String, HashMap<String, String>>> {
        self.tables.read().get(table).map(|t| t.families.clone())
    }

    pub(crate) fn is_enabled(
        &self,
        table: &str,
    ) -> Option<bool> {
        self.tables.read().get(table).map(|t| t.enabled)
    }

    fn admit<T>(
        &self,
        request: &Request<T>,
    ) -> Result<(), Status> {
        if let Some(user) = request
            .metadata()
            .get(EFFECTIVE_USER_METADATA_KEY)
            .and_then(|v| v.to_str().ok())
        {
            self.users.lock().push(user.to_string());
        }
        match self.fail_with.lock().as_ref() {
            Some(status) => Err(status.clone()),
            None => Ok(()),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn table_not_found(table: &str) -> Status {
    Status::not_found(format!("{TABLE_NOT_FOUND}: {table}"))
}

fn selected(
    columns: &[Column],
    family: &str,
    qualifier: &str,
) -> bool {
    columns.is_empty()
        || columns
            .iter()
            .any(|c| c.family == family && (c.qualifiers.is_empty() || c.qualifiers.iter().any(|q| q == qualifier)))
}

fn to_cells(
    row_key: &[u8],
    row: &MemRow,
) -> Vec<Cell> {
    row.iter()
        .map(|((family, qualifier), (value, timestamp))| Cell {
            row: row_key.to_vec(),
            family: family.clone(),
            qualifier: qualifier.clone(),
            value: value.clone(),
            timestamp: *timestamp,
        })
        .collect()
}

#[tonic::async_trait]
impl RowService for MemStoreService {
    type ScanStream = Pin<Box<dyn Stream<Item = Result<ScanResponse, Status>> + Send + 'static>>;

    async fn get(
        &self,
        request: Request<GetRequest>,
    ) -> Result<Response<GetResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();
        trace!("mem store get: {:?}", req);

        let tables = self.tables.read();
        let table = tables.get(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if !table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_ENABLED}: {}", req.table)));
        }
        table.ensure_families(req.columns.iter().map(|c| &c.family))?;

        let cells: Vec<Cell> = table
            .rows
            .get(&req.row)
            .map(|row| {
                to_cells(&req.row, row)
                    .into_iter()
                    .filter(|cell| selected(&req.columns, &cell.family, &cell.qualifier))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Response::new(GetResponse { cells }))
    }

    async fn put(
        &self,
        request: Request<PutRequest>,
    ) -> Result<Response<PutResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        if req.values.iter().all(|f| f.values.is_empty()) {
            return Err(Status::invalid_argument("No columns to insert"));
        }

        let timestamp = self.tick();
        let mut tables = self.tables.write();
        let table = tables.get_mut(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if !table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_ENABLED}: {}", req.table)));
        }
        table.ensure_families(req.values.iter().map(|f| &f.family))?;

        let row = table.rows.entry(req.row).or_default();
        for family in req.values {
            for column in family.values {
                row.insert((family.family.clone(), column.qualifier), (column.value, timestamp));
            }
        }

        Ok(Response::new(PutResponse {}))
    }

    async fn delete(
        &self,
        request: Request<DeleteRequest>,
    ) -> Result<Response<DeleteResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        let mut tables = self.tables.write();
        let table = tables.get_mut(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if !table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_ENABLED}: {}", req.table)));
        }
        table.ensure_families(req.columns.iter().map(|c| &c.family))?;

        if req.columns.is_empty() {
            table.rows.remove(&req.row);
        } else if let Some(row) = table.rows.get_mut(&req.row) {
            row.retain(|(family, qualifier), _| !selected(&req.columns, family, qualifier));
            if row.is_empty() {
                table.rows.remove(&req.row);
            }
        }

        Ok(Response::new(DeleteResponse {}))
    }

    async fn scan(
        &self,
        request: Request<ScanRequest>,
    ) -> Result<Response<Self::ScanStream>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        let tables = self.tables.read();
        let table = tables.get(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if !table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_ENABLED}: {}", req.table)));
        }

        let mut responses = Vec::new();
        for (row_key, row) in &table.rows {
            let mut cells = to_cells(row_key, row);
            for f in req.filters.iter().filter_map(|f| f.filter.as_ref()) {
                match f {
                    filter::Filter::Prefix(p) => {
                        if !row_key.starts_with(&p.prefix) {
                            cells.clear();
                        }
                    }
                    filter::Filter::ColumnPrefix(p) => {
                        cells.retain(|cell| cell.qualifier.as_bytes().starts_with(&p.prefix));
                    }
                }
            }
            if !cells.is_empty() {
                responses.push(Ok(ScanResponse { cells }));
            }
        }

        Ok(Response::new(Box::pin(tokio_stream::iter(responses))))
    }
}

#[tonic::async_trait]
impl AdminService for MemStoreService {
    async fn create_table(
        &self,
        request: Request<CreateTableRequest>,
    ) -> Result<Response<CreateTableResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        if req.families.is_empty() {
            return Err(Status::invalid_argument(format!(
                "Table {} should have at least one column family",
                req.table
            )));
        }

        let mut tables = self.tables.write();
        if tables.contains_key(&req.table) {
            return Err(Status::already_exists(format!("{TABLE_EXISTS}: {}", req.table)));
        }
        let table = MemTable {
            families: req.families.into_iter().map(|f| (f.name, f.attributes)).collect(),
            enabled: true,
            rows: BTreeMap::new(),
        };
        tables.insert(req.table, table);

        Ok(Response::new(CreateTableResponse {}))
    }

    async fn disable_table(
        &self,
        request: Request<DisableTableRequest>,
    ) -> Result<Response<DisableTableResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        let mut tables = self.tables.write();
        let table = tables.get_mut(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if !table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_ENABLED}: {}", req.table)));
        }
        table.enabled = false;

        Ok(Response::new(DisableTableResponse {}))
    }

    async fn delete_table(
        &self,
        request: Request<DeleteTableRequest>,
    ) -> Result<Response<DeleteTableResponse>, Status> {
        self.admit(&request)?;
        let req = request.into_inner();

        let mut tables = self.tables.write();
        let table = tables.get(&req.table).ok_or_else(|| table_not_found(&req.table))?;
        if table.enabled {
            return Err(Status::failed_precondition(format!("{TABLE_NOT_DISABLED}: {}", req.table)));
        }
        tables.remove(&req.table);

        Ok(Response::new(DeleteTableResponse {}))
    }

    async fn list_table_names(
        &self,
        request: Request<ListTableNamesRequest>,
    ) -> Result<Response<ListTableNamesResponse>, Status> {
        self.admit(&request)?;

        let table_names = self
            .tables
            .read()
            .keys()
            .map(|name| TableName::new(DEFAULT_NAMESPACE, name.clone()))
            .collect();

        Ok(Response::new(ListTableNamesResponse { table_names }))
    }
}
