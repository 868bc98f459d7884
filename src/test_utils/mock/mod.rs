//! Mock store for unit tests.
//!
//! [`MemStoreService`] implements both gRPC services against in-memory
//! tables, following the store's semantics closely enough to exercise the
//! real clients end to end: schema checks, enable/disable lifecycle,
//! timestamps, prefix and column-prefix filters.
//!
//! [`MockNode`] serves it on `127.0.0.1:0` and hands back a connected
//! [`crate::RowStoreDao`].
//!
//! Trait-level doubles ([`crate::MockRowClient`], [`crate::MockAdminClient`])
//! are generated by [mockall] next to the traits.

mod mem_store_service;
mod mock_rpc_service;

pub(crate) use mem_store_service::*;
pub(crate) use mock_rpc_service::*;
