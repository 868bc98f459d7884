//! Row store error hierarchy
//!
//! Every facade operation returns [`Result`]. Failures reported by the store
//! are classified into domain errors here, so callers can match on missing
//! rows, families and tables instead of parsing messages.

use config::ConfigError;
use tonic::Code;
use tonic::Status;

use crate::constants::NO_SUCH_COLUMN_FAMILY;
use crate::constants::TABLE_EXISTS;
use crate::constants::TABLE_NOT_DISABLED;
use crate::constants::TABLE_NOT_ENABLED;
use crate::constants::TABLE_NOT_FOUND;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Transport level failures
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The row has no cells, or none of the requested qualifiers
    #[error("No such row key or qualifier: {table}/{row_key}")]
    NoSuchRowKeyOrQualifier { table: String, row_key: String },

    /// A requested column family is not part of the table schema
    #[error("No such column family: {0}")]
    NoSuchColumnFamily(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table already exists: {0}")]
    TableExists(String),

    /// Disabling a table that is already disabled
    #[error("Table is not enabled: {0}")]
    TableNotEnabled(String),

    /// Deleting a table that is still enabled
    #[error("Table is not disabled: {0}")]
    TableNotDisabled(String),

    /// Request rejected before it was sent, or by the store as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other status returned by the store
    #[error(transparent)]
    Rpc(#[from] Box<Status>),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Malformed store endpoint
    #[error("Invalid URI format: {0}")]
    InvalidURI(String),

    /// Endpoint unavailable (connection refused, reset, not serving)
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request deadline exceeded
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// gRPC transport layer errors
    #[error(transparent)]
    TonicError(#[from] Box<tonic::transport::Error>),
}

impl Error {
    /// Classifies a status returned by the store for a request on `table`.
    pub(crate) fn from_status(
        status: Status,
        table: &str,
    ) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::NotFound if message.starts_with(NO_SUCH_COLUMN_FAMILY) => {
                Error::NoSuchColumnFamily(exception_detail(&message, NO_SUCH_COLUMN_FAMILY))
            }
            Code::NotFound if message.starts_with(TABLE_NOT_FOUND) => Error::TableNotFound(table.to_string()),
            Code::AlreadyExists if message.starts_with(TABLE_EXISTS) => Error::TableExists(table.to_string()),
            Code::FailedPrecondition if message.starts_with(TABLE_NOT_ENABLED) => {
                Error::TableNotEnabled(table.to_string())
            }
            Code::FailedPrecondition if message.starts_with(TABLE_NOT_DISABLED) => {
                Error::TableNotDisabled(table.to_string())
            }
            Code::InvalidArgument => Error::InvalidRequest(message),
            Code::Unavailable => NetworkError::ServiceUnavailable(message).into(),
            Code::DeadlineExceeded => NetworkError::Timeout(message).into(),
            _ => Error::Rpc(Box::new(status)),
        }
    }

    /// True for the errors that mean "the data is not there"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NoSuchRowKeyOrQualifier { .. } | Error::NoSuchColumnFamily(_) | Error::TableNotFound(_)
        )
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(e: tonic::transport::Error) -> Self {
        NetworkError::TonicError(Box::new(e)).into()
    }
}

/// `"NoSuchColumnFamilyException: cf"` -> `"cf"`
fn exception_detail(
    message: &str,
    exception: &str,
) -> String {
    message[exception.len()..].trim_start_matches(':').trim().to_string()
}
