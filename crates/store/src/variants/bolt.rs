//! Embedded B-tree file physical store, backed by `redb`. This is the
//! Bolt-equivalent persistent store: one on-disk file, one redb table
//! per sub, values round-tripped through the store's codec.

use crate::codec::Codec;
use crate::physical::PhysicalStore;
use parking_lot::RwLock;
use provision_core::{Error, Metadata, Result, StoreType, Value};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::PathBuf;

const META_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("__meta__");
const META_KEY: &str = "metadata";

/// A store backed by a single `redb` database file.
pub struct BoltStore {
    path: PathBuf,
    db: RwLock<Option<Database>>,
    codec: Box<dyn Codec>,
}

impl std::fmt::Debug for BoltStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoltStore").field("path", &self.path).finish()
    }
}

impl BoltStore {
    /// Open (creating if absent) the `redb` file at `path`.
    pub fn open(path: impl Into<PathBuf>, codec: Box<dyn Codec>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(&path).map_err(|e| Error::Io(e.to_string()))?;
        // Ensure the metadata table exists so list_tables() is stable.
        {
            let txn = db.begin_write().map_err(|e| Error::Io(e.to_string()))?;
            {
                let _ = txn.open_table(META_TABLE).map_err(|e| Error::Io(e.to_string()))?;
            }
            txn.commit().map_err(|e| Error::Io(e.to_string()))?;
        }
        Ok(BoltStore {
            path,
            db: RwLock::new(Some(db)),
            codec,
        })
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let guard = self.db.read();
        match guard.as_ref() {
            Some(db) => f(db),
            None => Err(Error::Closed),
        }
    }
}

impl PhysicalStore for BoltStore {
    fn store_type(&self) -> StoreType {
        StoreType::Bolt
    }

    fn close(&self) -> Result<()> {
        *self.db.write() = None;
        Ok(())
    }

    fn keys(&self, sub: &str) -> Result<Vec<String>> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(|e| Error::Io(e.to_string()))?;
            let table_def: TableDefinition<&str, &[u8]> = TableDefinition::new(sub);
            let table = match txn.open_table(table_def) {
                Ok(t) => t,
                Err(_) => return Ok(Vec::new()),
            };
            let mut keys = Vec::new();
            for row in table.iter().map_err(|e| Error::Io(e.to_string()))? {
                let (k, _) = row.map_err(|e| Error::Io(e.to_string()))?;
                keys.push(k.value().to_string());
            }
            keys.sort();
            Ok(keys)
        })
    }

    fn subs(&self) -> Vec<String> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(|e| Error::Io(e.to_string()))?;
            let mut subs = Vec::new();
            for handle in txn.list_tables().map_err(|e| Error::Io(e.to_string()))? {
                let name = handle.name().to_string();
                if name != "__meta__" {
                    subs.push(name);
                }
            }
            subs.sort();
            Ok(subs)
        })
        .unwrap_or_default()
    }

    fn load(&self, sub: &str, key: &str) -> Result<Value> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(|e| Error::Io(e.to_string()))?;
            let table_def: TableDefinition<&str, &[u8]> = TableDefinition::new(sub);
            let table = txn
                .open_table(table_def)
                .map_err(|_| Error::not_found(sub, key))?;
            let bytes = table
                .get(key)
                .map_err(|e| Error::Io(e.to_string()))?
                .ok_or_else(|| Error::not_found(sub, key))?;
            self.codec.decode(bytes.value()).map_err(Into::into)
        })
    }

    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        let bytes = self.codec.encode(value)?;
        self.with_db(|db| {
            let txn = db.begin_write().map_err(|e| Error::Io(e.to_string()))?;
            {
                let table_def: TableDefinition<&str, &[u8]> = TableDefinition::new(sub);
                let mut table = txn.open_table(table_def).map_err(|e| Error::Io(e.to_string()))?;
                table
                    .insert(key, bytes.as_slice())
                    .map_err(|e| Error::Io(e.to_string()))?;
            }
            txn.commit().map_err(|e| Error::Io(e.to_string()))
        })
    }

    fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.with_db(|db| {
            let txn = db.begin_write().map_err(|e| Error::Io(e.to_string()))?;
            let removed = {
                let table_def: TableDefinition<&str, &[u8]> = TableDefinition::new(sub);
                let mut table = txn
                    .open_table(table_def)
                    .map_err(|_| Error::not_found(sub, key))?;
                table
                    .remove(key)
                    .map_err(|e| Error::Io(e.to_string()))?
                    .is_some()
            };
            txn.commit().map_err(|e| Error::Io(e.to_string()))?;
            if removed {
                Ok(())
            } else {
                Err(Error::not_found(sub, key))
            }
        })
    }

    fn location(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }

    fn metadata(&self) -> Option<Metadata> {
        self.with_db(|db| {
            let txn = db.begin_read().map_err(|e| Error::Io(e.to_string()))?;
            let table = txn.open_table(META_TABLE).map_err(|e| Error::Io(e.to_string()))?;
            let bytes = table
                .get(META_KEY)
                .map_err(|e| Error::Io(e.to_string()))?
                .ok_or_else(|| Error::not_found("__meta__", META_KEY))?;
            let value = self.codec.decode(bytes.value())?;
            serde_json::from_value(value).map_err(|e| Error::Io(e.to_string()))
        })
        .ok()
    }

    fn set_metadata(&self, metadata: Metadata) {
        let Ok(value) = serde_json::to_value(&metadata) else { return };
        let Ok(bytes) = self.codec.encode(&value) else { return };
        let _ = self.with_db(|db| {
            let txn = db.begin_write().map_err(|e| Error::Io(e.to_string()))?;
            {
                let mut table = txn.open_table(META_TABLE).map_err(|e| Error::Io(e.to_string()))?;
                table
                    .insert(META_KEY, bytes.as_slice())
                    .map_err(|e| Error::Io(e.to_string()))?;
            }
            txn.commit().map_err(|e| Error::Io(e.to_string()))
        });
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
        let store = BoltStore::open(dir.path().join("data.redb"), Box::new(JsonCodec)).unwrap();
        store.save("bootenvs", "b1", &json!({"kernel": "vmlinuz"})).unwrap();
        assert_eq!(store.load("bootenvs", "b1").unwrap(), json!({"kernel": "vmlinuz"}));
    }

    #[test]
    fn subs_excludes_meta_table() {
        let dir = tempdir().unwrap();
        let store = BoltStore::open(dir.path().join("data.redb"), Box::new(JsonCodec)).unwrap();
        store.save("bootenvs", "b1", &json!(1)).unwrap();
        assert_eq!(store.subs(), vec!["bootenvs".to_string()]);
    }

    #[test]
    fn operations_fail_after_close() {
        let dir = tempdir().unwrap();
        let store = BoltStore::open(dir.path().join("data.redb"), Box::new(JsonCodec)).unwrap();
        store.close().unwrap();
        assert!(matches!(store.load("bootenvs", "b1"), Err(Error::Closed)));
    }
}
