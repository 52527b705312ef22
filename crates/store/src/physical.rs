//! The `PhysicalStore` contract (spec §4.1): a named sub-bucketed
//! key/value container, dispatched by variant tag rather than a deep
//! trait hierarchy (§9's design note).

use provision_core::{Metadata, Result, StoreType, Value};

/// A key/value container scoped by named sub-buckets.
///
/// Implementations must be `Send + Sync`: a store may be shared by
/// several layers across reader threads once opened. `close()` is
/// idempotent; every other operation must fail with
/// `provision_core::Error::Closed` once `close()` has run.
pub trait PhysicalStore: Send + Sync + std::fmt::Debug {
    /// The variant tag for this store.
    fn store_type(&self) -> StoreType;

    /// Release file handles or connections. Idempotent.
    fn close(&self) -> Result<()>;

    /// Keys stored in `sub`, sorted lexicographically. Empty if `sub`
    /// is absent.
    fn keys(&self, sub: &str) -> Result<Vec<String>>;

    /// Every known sub namespace in this store.
    fn subs(&self) -> Vec<String>;

    /// Load the value for `(sub, key)`. `Error::NotFound` if absent.
    fn load(&self, sub: &str, key: &str) -> Result<Value>;

    /// Persist `value` at `(sub, key)`. `Error::ReadOnly` on read-only
    /// stores.
    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()>;

    /// Remove `(sub, key)`. `Error::NotFound` if absent, `Error::ReadOnly`
    /// if the store is read-only.
    fn remove(&self, sub: &str, key: &str) -> Result<()>;

    /// The filesystem path or URI this store was opened from, if any
    /// (used by `cleanup()` to remove on-disk artifacts). `None` for
    /// in-memory and remote stores.
    fn location(&self) -> Option<String>;

    /// Read the metadata map, if this store carries one.
    fn metadata(&self) -> Option<Metadata>;

    /// Replace the metadata map.
    fn set_metadata(&self, metadata: Metadata);
}
