//! # rowstore
//!
//! Data-access facade over a distributed column-family store.
//!
//! One shared [`Connection`] carries both a [`RowClient`] and an
//! [`AdminClient`]; [`RowStoreDao`] turns them into table administration
//! (create / delete / exists) and row operations (get / put / delete / scan by
//! row prefix / scan by column value).
//!
//! Configuration comes from [`StoreConfig`]; every operation returns
//! [`Result`].

mod client;
mod config;
mod constants;
mod dao;
mod errors;
mod model;
mod scoped_timer;
pub mod proto;

pub use client::*;
pub use self::config::*;
pub use dao::*;
pub use errors::*;
pub use model::*;
pub use proto::TableName;

//-----------------------------------------------------------
// Test utils
