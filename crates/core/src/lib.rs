//! Shared types for the provisioning server's content datastack.
//!
//! This crate defines the error type, the metadata schema, and the
//! store-type tag used across `provision-store`, `provision-stack`,
//! `provision-concurrency`, and `provision-composer`. It holds no
//! storage logic of its own.

#![warn(missing_docs)]

mod error;
mod metadata;
mod store_type;

pub use error::{Error, Result};
pub use metadata::Metadata;
pub use store_type::StoreType;

/// The content value stored and loaded by every physical store.
///
/// Content records (subnets, bootenvs, machines, ...) are heterogeneous
/// per sub, so the datastack carries them as a generic JSON value
/// rather than a fixed Rust type; typed access is layered on top by
/// callers via `serde_json::from_value`/`to_value`. This also gives the
/// fixer structural equality for free (`serde_json::Value` derives
/// `PartialEq`).
pub type Value = serde_json::Value;
