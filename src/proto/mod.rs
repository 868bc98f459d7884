//! Protocol Buffer definitions and generated code for the row store RPC
//! services.
//!
//! Types are generated from `proto/rowstore.proto` by [`tonic-build`] at
//! build time, with request constructors added alongside.

mod rowstore_ext;


tonic::include_proto!("rowstore");
