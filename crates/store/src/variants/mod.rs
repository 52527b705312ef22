//! Physical store variants: one self-contained record per variant,
//! dispatched by `StoreType` rather than a deep trait hierarchy.

mod bolt;
mod directory;
mod file;
mod memory;
mod remote;

pub use bolt::BoltStore;
pub use directory::DirectoryStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;
