//! Single flat file physical store: the whole store's content is one
//! serialized blob (metadata + every sub's key/value map), rewritten
//! atomically on every mutation.

use crate::codec::Codec;
use crate::physical::PhysicalStore;
use parking_lot::RwLock;
use provision_core::{Error, Metadata, Result, StoreType, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct FileContent {
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    subs: BTreeMap<String, BTreeMap<String, Value>>,
}

/// A store backed by a single file holding a serialized blob.
pub struct FileStore {
    path: PathBuf,
    codec: Box<dyn Codec>,
    content: RwLock<FileContent>,
    closed: RwLock<bool>,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore").field("path", &self.path).finish()
    }
}

impl FileStore {
    /// Open (creating if absent) the file at `path`, using `codec` for
    /// (de)serialization.
    pub fn open(path: impl AsRef<Path>, codec: Box<dyn Codec>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = if path.exists() {
            let bytes = std::fs::read(&path)?;
            if bytes.is_empty() {
                FileContent::default()
            } else {
                let value: Value = codec.decode(&bytes)?;
                serde_json::from_value(value)
                    .map_err(|e| Error::Io(format!("malformed store file {}: {e}", path.display())))?
            }
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            FileContent::default()
        };
        let store = FileStore {
            path,
            codec,
            content: RwLock::new(content),
            closed: RwLock::new(false),
        };
        store.flush()?;
        Ok(store)
    }

    fn check_open(&self) -> Result<()> {
        if *self.closed.read() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn flush(&self) -> Result<()> {
        let content = self.content.read();
        let value = serde_json::to_value(&*content)
            .map_err(|e| Error::Io(format!("encoding store file: {e}")))?;
        let bytes = self.codec.encode(&value)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PhysicalStore for FileStore {
    fn store_type(&self) -> StoreType {
        StoreType::File
    }

    fn close(&self) -> Result<()> {
        *self.closed.write() = true;
        Ok(())
    }

    fn keys(&self, sub: &str) -> Result<Vec<String>> {
        self.check_open()?;
        let content = self.content.read();
        let mut keys: Vec<String> = content
            .subs
            .get(sub)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    fn subs(&self) -> Vec<String> {
        self.content.read().subs.keys().cloned().collect()
    }

    fn load(&self, sub: &str, key: &str) -> Result<Value> {
        self.check_open()?;
        self.content
            .read()
            .subs
            .get(sub)
            .and_then(|m| m.get(key).cloned())
            .ok_or_else(|| Error::not_found(sub, key))
    }

    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        self.check_open()?;
        {
            let mut content = self.content.write();
            content
                .subs
                .entry(sub.to_string())
                .or_default()
                .insert(key.to_string(), value.clone());
        }
        self.flush()
    }

    fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.check_open()?;
        let removed = {
            let mut content = self.content.write();
            content
                .subs
                .get_mut(sub)
                .and_then(|m| m.remove(key))
                .is_some()
        };
        if !removed {
            return Err(Error::not_found(sub, key));
        }
        self.flush()
    }

    fn location(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    fn metadata(&self) -> Option<Metadata> {
        self.content.read().metadata.clone()
    }

    fn set_metadata(&self, metadata: Metadata) {
        self.content.write().metadata = Some(metadata);
        let _ = self.flush();
    }
}
