//! The `PhysicalStore` contract, its variants, the codec seam, and
//! store-URI parsing (spec §4.1, §6).
//!
//! `open(uri)` is the sole constructor external callers need — it
//! parses the URI, resolves the codec, and dispatches to the right
//! variant. `cleanup()` is the composer-only counterpart that removes
//! on-disk artifacts for a store displaced by a rebuild.

#![warn(missing_docs)]

pub mod codec;
mod physical;
mod uri;
mod variants;

pub use physical::PhysicalStore;
pub use uri::StoreUri;
pub use variants::{BoltStore, DirectoryStore, FileStore, MemoryStore, RemoteStore};

use provision_core::{Result, StoreType};
use std::sync::Arc;

/// Parse `uri` and open the named physical store.
///
/// Unknown schemes fail with `provision_core::Error::Config`, per
/// spec §4.1.
pub fn open(uri: &str) -> Result<Arc<dyn PhysicalStore>> {
    let parsed = StoreUri::parse(uri)?;
    let codec = codec::get_codec(parsed.codec_id())?;
    let store: Arc<dyn PhysicalStore> = match parsed.store_type {
        StoreType::Memory => Arc::new(MemoryStore::new()),
        StoreType::File => Arc::new(FileStore::open(&parsed.path, codec)?),
        StoreType::Directory => Arc::new(DirectoryStore::open(&parsed.path, codec)?),
        StoreType::Bolt => Arc::new(BoltStore::open(&parsed.path, codec)?),
        StoreType::Remote => {
            let scheme = if uri.starts_with("consul") { "consul" } else { "remote" };
            Arc::new(RemoteStore::new(format!("{scheme}://{}", parsed.path)))
        }
    };
    Ok(store)
}

/// Close `store` and, for a locally-owned physical artifact, remove it
/// from disk.
///
/// Called only on a store that has just been displaced by a successful
/// rebuild (spec §4.1 "Cleanup semantics"). Best-effort: failures are
/// logged, never propagated, so a cleanup failure cannot abort an
/// otherwise-successful rebuild.
pub fn cleanup(store: &dyn PhysicalStore) {
    let store_type = store.store_type();
    let location = store.location();
    if let Err(e) = store.close() {
        tracing::warn!(error = %e, store_type = %store_type, "failed to close displaced store");
        return;
    }
    if !store_type.owns_local_artifact() {
        return;
    }
    let Some(location) = location else { return };
    let path = std::path::Path::new(&location);
    let result = if store_type == StoreType::Directory {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, path = %location, "failed to remove displaced store artifact");
    } else {
        tracing::info!(path = %location, store_type = %store_type, "removed displaced store artifact");
    }
}
