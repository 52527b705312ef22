//! In-memory physical store. Never persisted; used for `basicContent`
//! (built-in immutable content) and for tests.

use crate::physical::PhysicalStore;
use parking_lot::RwLock;
use provision_core::{Error, Metadata, Result, StoreType, Value};
use std::collections::BTreeMap;

/// A store backed entirely by an in-process `BTreeMap`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subs: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
    metadata: RwLock<Option<Metadata>>,
    closed: RwLock<bool>,
}

impl MemoryStore {
    /// An empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a memory store pre-populated from a literal map, handy for
    /// constructing `basicContent` and test fixtures in one call.
    pub fn from_content(content: BTreeMap<String, BTreeMap<String, Value>>) -> Self {
        MemoryStore {
            subs: RwLock::new(content),
            metadata: RwLock::new(None),
            closed: RwLock::new(false),
        }
    }

    fn check_open(&self) -> Result<()> {
        if *self.closed.read() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }
}

impl PhysicalStore for MemoryStore {
    fn store_type(&self) -> StoreType {
        StoreType::Memory
    }

    fn close(&self) -> Result<()> {
        *self.closed.write() = true;
        Ok(())
    }

    fn keys(&self, sub: &str) -> Result<Vec<String>> {
        self.check_open()?;
        let subs = self.subs.read();
        let mut keys: Vec<String> = subs
            .get(sub)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }

    fn subs(&self) -> Vec<String> {
        self.subs.read().keys().cloned().collect()
    }

    fn load(&self, sub: &str, key: &str) -> Result<Value> {
        self.check_open()?;
        self.subs
            .read()
            .get(sub)
            .and_then(|m| m.get(key).cloned())
            .ok_or_else(|| Error::not_found(sub, key))
    }

    fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        self.check_open()?;
        self.subs
            .write()
            .entry(sub.to_string())
            .or_default()
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.check_open()?;
        let mut subs = self.subs.write();
        let removed = subs
            .get_mut(sub)
            .and_then(|m| m.remove(key))
            .is_some();
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(sub, key))
        }
    }

    fn location(&self) -> Option<String> {
        None
    }

    fn metadata(&self) -> Option<Metadata> {
        self.metadata.read().clone()
    }

    fn set_metadata(&self, metadata: Metadata) {
        *self.metadata.write() = Some(metadata);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        store.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();
        assert_eq!(store.load("subnets", "s1").unwrap(), json!({"addr": "192.168.1.0"}));
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.save("subnets", "s2", &json!(1)).unwrap();
        store.save("subnets", "s1", &json!(2)).unwrap();
        assert_eq!(store.keys("subnets").unwrap(), vec!["s1", "s2"]);
    }

    #[test]
    fn missing_sub_returns_empty_keys() {
        let store = MemoryStore::new();
        assert!(store.keys("nope").unwrap().is_empty());
    }

    #[test]
    fn load_missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.load("subnets", "s1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn remove_missing_key_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.remove("subnets", "s1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn operations_fail_after_close() {
        let store = MemoryStore::new();
        store.close().unwrap();
        assert!(matches!(store.load("subnets", "s1"), Err(Error::Closed)));
    }

    #[test]
    fn close_is_idempotent() {
        let store = MemoryStore::new();
        store.close().unwrap();
        store.close().unwrap();
    }
}
