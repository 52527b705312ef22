//! Directory-tree physical store: one subdirectory per sub, one file
//! per key. Metadata lives in a dotfile at the directory root so it
//! does not show up as a spurious sub.

use crate::codec::Codec;
use crate::physical::PhysicalStore;
use parking_lot::RwLock;
use provision_core::{Error, Metadata, Result, StoreType, Value};
use std::path::PathBuf;

const META_FILE: &str = ".metadata";

/// A store backed by a directory tree, one file per (sub, key).
pub struct DirectoryStore {
    root: PathBuf,
    codec: Box<dyn Codec>,
    ext: &'static str,
    closed: RwLock<bool>,
}

impl std::fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryStore").field("root", &self.root).finish()
    }
}

impl DirectoryStore {
    /// Open (creating if absent) the directory at `root`.
    pub fn open(root: impl Into<PathBuf>, codec: Box<dyn Codec>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let ext = match codec.id() {
            "yaml" => "yaml",
            _ => "json",
        };
        Ok(DirectoryStore {
            root,
            codec,
            ext,
            closed: RwLock::new(false),
        })
    }

    fn check_open(&self) -> Result<()> {
        if *self.closed.read() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn sub_dir(&self, sub: &str) -> PathBuf {
        self.root.join(sub)
    }

    fn key_path(&self, sub: &str, key: &str) -> PathBuf {
        self.sub_dir(sub).join(format!("{key}.{}", self.ext))
    }

    fn meta_path(&self) -> PathBuf {
        self.root.join(META_FILE)
    }
}

impl PhysicalStore for DirectoryStore {
    fn store_type(&self) -> StoreType {
        StoreType::Directory
    }

    fn close(&self) -> Result<()> {
        *self.closed.write() = true;
        Ok(())
    }

    fn keys(&self, sub: &str) -> Result<Vec<String>> {
        self.check_open()?;
        let dir = self.sub_dir(sub);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn subs(&self) -> Vec<String> {
        let mut subs = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    if let Some(name) = entry.file_name().to_str() {
                        subs.push(name.to_string());
                    }
                }
            }
        }
        subs.sort();
        subs
    }

    fn load(&self, sub: &str, key: &str) -> Result<Value> {
        self.check_open()?;
        let path = self.key_path(sub, key);
        let bytes = std::fs::read(&path).map_err(|_| Error::not_found(sub, key))?;
        Ok(self.codec.decode(&bytes)?)
    }

    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        self.check_open()?;
        std::fs::create_dir_all(self.sub_dir(sub))?;
        let bytes = self.codec.encode(value)?;
        std::fs::write(self.key_path(sub, key), bytes)?;
        Ok(())
    }

    fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.check_open()?;
        let path = self.key_path(sub, key);
        std::fs::remove_file(&path).map_err(|_| Error::not_found(sub, key))
    }

    fn location(&self) -> Option<String> {
        Some(self.root.display().to_string())
    }

    fn metadata(&self) -> Option<Metadata> {
        let bytes = std::fs::read(self.meta_path()).ok()?;
        let value: Value = self.codec.decode(&bytes).ok()?;
        serde_json::from_value(value).ok()
    }

    fn set_metadata(&self, metadata: Metadata) {
        if let Ok(value) = serde_json::to_value(&metadata) {
            if let Ok(bytes) = self.codec.encode(&value) {
                let _ = std::fs::write(self.meta_path(), bytes);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), Box::new(JsonCodec)).unwrap();
        store.save("machines", "m1", &json!({"name": "m1"})).unwrap();
        assert_eq!(store.load("machines", "m1").unwrap(), json!({"name": "m1"}));
    }

    #[test]
    fn keys_reflect_filesystem() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), Box::new(JsonCodec)).unwrap();
        store.save("machines", "m2", &json!(1)).unwrap();
        store.save("machines", "m1", &json!(2)).unwrap();
        assert_eq!(store.keys("machines").unwrap(), vec!["m1", "m2"]);
    }

    #[test]
    fn subs_excludes_metadata_dotfile() {
        let dir = tempdir().unwrap();
        let store = DirectoryStore::open(dir.path(), Box::new(JsonCodec)).unwrap();
        store.set_metadata(Metadata::named("LocalStore"));
        store.save("machines", "m1", &json!(1)).unwrap();
        assert_eq!(store.subs(), vec!["machines".to_string()]);
    }

    #[test]
    fn metadata_round_trips_across_open() {
        let dir = tempdir().unwrap();
        {
            let store = DirectoryStore::open(dir.path(), Box::new(JsonCodec)).unwrap();
            store.set_metadata(Metadata::named("LocalStore"));
        }
        let reopened = DirectoryStore::open(dir.path(), Box::new(JsonCodec)).unwrap();
        assert_eq!(reopened.metadata().unwrap().name(), Some("LocalStore"));
    }
}
