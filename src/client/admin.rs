use tonic::async_trait;
use tracing::debug;
use tracing::error;

use super::AdminClient;
use super::Connection;
use crate::proto::CreateTableRequest;
use crate::proto::DeleteTableRequest;
use crate::proto::DisableTableRequest;
use crate::proto::ListTableNamesRequest;
use crate::proto::TableName;
use crate::scoped_timer::ScopedTimer;
use crate::Error;
use crate::Result;

/// gRPC admin client
#[derive(Clone)]
pub struct GrpcAdminClient {
    connection: Connection,
}

impl GrpcAdminClient {
    pub fn new(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

#[async_trait]
impl AdminClient for GrpcAdminClient {
    async fn create_table(
        &self,
        request: CreateTableRequest,
    ) -> Result<()> {
        let table = request.table.clone();
        let _timer = ScopedTimer::new("admin::create_table", &table);

        let mut client = self.connection.admin_service();
        client
            .create_table(self.connection.request(request))
            .await
            .map(|response| debug!("[:GrpcAdminClient:create_table] response: {:?}", response))
            .map_err(|status| {
                error!("[:GrpcAdminClient:create_table] status: {:?}", status);
                Error::from_status(status, &table)
            })
    }

    async fn disable_table(
        &self,
        table: &str,
    ) -> Result<()> {
        let _timer = ScopedTimer::new("admin::disable_table", table);

        let request = DisableTableRequest {
            table: table.to_string(),
        };
        let mut client = self.connection.admin_service();
        client
            .disable_table(self.connection.request(request))
            .await
            .map(|response| debug!("[:GrpcAdminClient:disable_table] response: {:?}", response))
            .map_err(|status| {
                error!("[:GrpcAdminClient:disable_table] status: {:?}", status);
                Error::from_status(status, table)
            })
    }

    async fn delete_table(
        &self,
        table: &str,
    ) -> Result<()> {
        let _timer = ScopedTimer::new("admin::delete_table", table);

        let request = DeleteTableRequest {
            table: table.to_string(),
        };
        let mut client = self.connection.admin_service();
        client
            .delete_table(self.connection.request(request))
            .await
            .map(|response| debug!("[:GrpcAdminClient:delete_table] response: {:?}", response))
            .map_err(|status| {
                error!("[:GrpcAdminClient:delete_table] status: {:?}", status);
                Error::from_status(status, table)
            })
    }

    async fn list_table_names(&self) -> Result<Vec<TableName>> {
        let _timer = ScopedTimer::new("admin::list_table_names", "*");

        let request = ListTableNamesRequest::default();
        let mut client = self.connection.admin_service();
        match client.list_table_names(self.connection.request(request)).await {
            Ok(response) => {
                let table_names = response.into_inner().table_names;
                debug!("[:GrpcAdminClient:list_table_names] {} tables", table_names.len());
                Ok(table_names)
            }
            Err(status) => {
                error!("[:GrpcAdminClient:list_table_names] status: {:?}", status);
                Err(Error::from_status(status, ""))
            }
        }
    }
}
