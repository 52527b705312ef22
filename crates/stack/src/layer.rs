//! A single layer in a `StackedStore`: a physical store plus the two
//! flags that govern how the stack treats it (spec §3, "Entity: Layer").

use provision_store::PhysicalStore;
use std::sync::Arc;

/// A physical store inserted at a specific position in the stacked view.
pub struct Layer {
    /// The underlying physical store.
    pub store: Arc<dyn PhysicalStore>,
    /// Writes to this layer fail when true.
    ///
    /// Every layer except the write-through layer is read-only from the
    /// stack's perspective; content layers (SaaS/plugin/basic) are never
    /// written to directly through the stacked view.
    pub read_only: bool,
    /// Whether this is the single layer that absorbs all writes from
    /// the stacked view. Always layer 0.
    pub write_through: bool,
}

impl Layer {
    pub(crate) fn new(store: Arc<dyn PhysicalStore>, write_through: bool) -> Self {
        Layer {
            store,
            read_only: !write_through,
            write_through,
        }
    }
}
