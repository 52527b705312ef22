//! The stacked store: an ordered sequence of `PhysicalStore` layers
//! presented as one logical read-mostly key/value store (spec §4.2).

#![warn(missing_docs)]

mod layer;
mod stacked;

pub use layer::Layer;
pub use stacked::StackedStore;
