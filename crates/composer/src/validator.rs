//! The external validation and basic-content injection seams (spec
//! §4.5, §9 "Validator callback... must be injected, not imported").

use crate::DataStack;
use provision_core::Error;
use provision_store::{MemoryStore, PhysicalStore};
use std::sync::Arc;

/// Runs once per rebuild, after every layer push completes.
///
/// `hard` rejects the candidate stack outright (the composer reverts
/// to the stack currently live). `soft` is returned to the caller
/// alongside a successful rebuild for logging; it never blocks a
/// rebuild by itself.
pub trait Validator: Send + Sync {
    /// Validate `stack`, returning an optional hard and an optional
    /// soft error.
    fn validate(&self, stack: &DataStack) -> (Option<Error>, Option<Error>);
}

/// A validator that always accepts the candidate stack. Useful for
/// tests and for callers that have no backend entity system to check
/// against.
pub struct AcceptAll;

impl Validator for AcceptAll {
    fn validate(&self, _stack: &DataStack) -> (Option<Error>, Option<Error>) {
        (None, None)
    }
}

/// Supplies the immutable built-in `basicContent` role slot.
///
/// Per spec §9, the backend entity system owns what "basic" content
/// actually is; this crate only defines the seam so callers can inject
/// their own without this crate depending on the backend.
pub trait BasicContentProvider: Send + Sync {
    /// Produce the basic-content physical store.
    fn basic_content(&self) -> Arc<dyn PhysicalStore>;
}

/// A `BasicContentProvider` with no content, for standalone testing.
pub struct EmptyBasicContent;

impl BasicContentProvider for EmptyBasicContent {
    fn basic_content(&self) -> Arc<dyn PhysicalStore> {
        Arc::new(MemoryStore::new())
    }
}
