//! Content datastack for a bare-metal provisioning server.
//!
//! This crate is a thin facade over the workspace members that do the
//! actual work: `provision-core` (shared types), `provision-store`
//! (physical store variants and codecs), `provision-stack` (the
//! stacked store), `provision-concurrency` (live-stack swap and entity
//! locking), and `provision-composer` (the six-role datastack and its
//! rebuild/fixer/validator machinery). See `spec.md` §2 for the
//! component map.
//!
//! ```no_run
//! use provision_datastack::{default_data_stack, DataStackConfig, MemoryStore, PhysicalStore};
//! use std::sync::Arc;
//!
//! fn main() -> provision_datastack::Result<()> {
//!     let cfg = DataStackConfig {
//!         backend_type: "memory".to_string(),
//!         data_root: String::new(),
//!         local_content: None,
//!         default_content: None,
//!         saas_content_root: None,
//!     };
//!     let basic_content: Arc<dyn PhysicalStore> = Arc::new(MemoryStore::new());
//!     let stack = default_data_stack(&cfg, basic_content)?;
//!     let _ = stack.stack().keys("bootenvs")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub use provision_core::{Error, Metadata, Result, StoreType, Value};

pub use provision_store::{codec, open as open_store, BoltStore, DirectoryStore, FileStore, MemoryStore, PhysicalStore, RemoteStore, StoreUri};

pub use provision_stack::{Layer, StackedStore};

pub use provision_concurrency::{LiveStack, LockEnts, LockedSubs, RebuildGuard, SubView};

pub use provision_composer::{
    add_replace_plugin, add_replace_saas, default_data_stack, fix_basic, rebuild, remove_plugin,
    remove_saas, AcceptAll, BasicContentProvider, DataStack, DataStackConfig, EmptyBasicContent,
    FixerUpper, RebuildOutcome, Validator,
};
