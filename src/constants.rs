// -
// Request metadata

/// gRPC metadata key carrying the identity the store executes requests as
pub(crate) const EFFECTIVE_USER_METADATA_KEY: &str = "x-effective-user";

// -
// Store exception markers
//
// The store reports schema and lifecycle failures as a status whose message
// starts with the exception class name.

pub(crate) const NO_SUCH_COLUMN_FAMILY: &str = "NoSuchColumnFamilyException";
pub(crate) const TABLE_NOT_FOUND: &str = "TableNotFoundException";
pub(crate) const TABLE_EXISTS: &str = "TableExistsException";
pub(crate) const TABLE_NOT_ENABLED: &str = "TableNotEnabledException";
pub(crate) const TABLE_NOT_DISABLED: &str = "TableNotDisabledException";

/// Namespace tables live in when none is given
#[cfg(test)]
pub(crate) const DEFAULT_NAMESPACE: &str = "default";
