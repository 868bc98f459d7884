use futures::TryStreamExt;
use tonic::async_trait;
use tracing::debug;
use tracing::error;

use super::Connection;
use super::RowClient;
use crate::proto::DeleteRequest;
use crate::proto::GetRequest;
use crate::proto::PutRequest;
use crate::proto::ScanRequest;
use crate::scoped_timer::ScopedTimer;
use crate::Error;
use crate::Result;
use crate::RowResult;

/// gRPC row client
#[derive(Clone)]
pub struct GrpcRowClient {
    connection: Connection,
}

impl GrpcRowClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl RowClient for GrpcRowClient {
    async fn get(
        &self,
        request: GetRequest,
    ) -> Result<RowResult> {
        let table = request.table.clone();
        let _timer = ScopedTimer::new("rows::get", &table);

        let mut client = self.connection.row_service();
        match client.get(self.connection.request(request)).await {
            Ok(response) => {
                let result = RowResult::from(response.into_inner().cells);
                debug!("[:GrpcRowClient:get] {} cells from {}", result.len(), table);
                Ok(result)
            }
            Err(status) => {
                error!("[:GrpcRowClient:get] status: {:?}", status);
                Err(Error::from_status(status, &table))
            }
        }
    }

    async fn put(
        &self,
        request: PutRequest,
    ) -> Result<()> {
        let table = request.table.clone();
        let _timer = ScopedTimer::new("rows::put", &table);

        let mut client = self.connection.row_service();
        match client.put(self.connection.request(request)).await {
            Ok(response) => {
                debug!("[:GrpcRowClient:put] response: {:?}", response);
                Ok(())
            }
            Err(status) => {
                error!("[:GrpcRowClient:put] status: {:?}", status);
                Err(Error::from_status(status, &table))
            }
        }
    }

    async fn delete(
        &self,
        request: DeleteRequest,
    ) -> Result<()> {
        let table = request.table.clone();
        let _timer = ScopedTimer::new("rows::delete", &table);

        let mut client = self.connection.row_service();
        match client.delete(self.connection.request(request)).await {
            Ok(response) => {
                debug!("[:GrpcRowClient:delete] response: {:?}", response);
                Ok(())
            }
            Err(status) => {
                error!("[:GrpcRowClient:delete] status: {:?}", status);
                Err(Error::from_status(status, &table))
            }
        }
    }

    async fn scan(
        &self,
        request: ScanRequest,
    ) -> Result<Vec<RowResult>> {
        let table = request.table.clone();
        let _timer = ScopedTimer::new("rows::scan", &table);

        let mut client = self.connection.row_service();
        let stream = match client.scan(self.connection.request(request)).await {
            Ok(response) => response.into_inner(),
            Err(status) => {
                error!("[:GrpcRowClient:scan] status: {:?}", status);
                return Err(Error::from_status(status, &table));
            }
        };

        let rows: Vec<RowResult> = stream
            .map_ok(|row| RowResult::from(row.cells))
            .try_collect()
            .await
            .map_err(|status| {
                error!("[:GrpcRowClient:scan] stream interrupted: {:?}", status);
                Error::from_status(status, &table)
            })?;

        debug!("[:GrpcRowClient:scan] {} rows from {}", rows.len(), table);
        Ok(rows)
    }
}
