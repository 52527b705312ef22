//! The unified key-lookup view over an ordered sequence of layers
//! (spec §4.2).

use crate::layer::Layer;
use provision_core::{Error, Result, Value};
use provision_store::PhysicalStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Ordered sequence of layers presenting one logical key/value store.
///
/// Invariant: for any (sub, key), `load` returns the value from the
/// lowest-indexed layer whose sub contains that key; `keys(sub)`
/// returns the sorted union across layers.
#[derive(Default)]
pub struct StackedStore {
    layers: Vec<Layer>,
}

impl StackedStore {
    /// An empty stack with no layers.
    pub fn new() -> Self {
        StackedStore { layers: Vec::new() }
    }

    /// Push `store` onto the top of the stack (conceptually the next
    /// index; `load` still prefers lower indices, so "top" here means
    /// latest-pushed, not highest-precedence).
    ///
    /// `mark_content = true` allows the new layer to silently shadow an
    /// existing (sub, key) pair from a lower layer — used for SaaS and
    /// plugin content. `mark_content = false` fails with
    /// `Error::Overlap` if the new layer declares a (sub, key) that a
    /// lower layer already has with a *different* value (equal values
    /// are not a conflict — the composer relies on this to push
    /// `basicContent` a second time after the fixer runs).
    ///
    /// `mark_write = true` designates this layer as write-through and
    /// is only legal for the very first push.
    pub fn push(&mut self, store: Arc<dyn PhysicalStore>, mark_content: bool, mark_write: bool) -> Result<()> {
        if mark_write && !self.layers.is_empty() {
            return Err(Error::config("write-through layer must be pushed first"));
        }

        if !mark_content {
            for sub in store.subs() {
                for key in store.keys(&sub)? {
                    let candidate = store.load(&sub, &key)?;
                    for existing in &self.layers {
                        match existing.store.load(&sub, &key) {
                            Ok(existing_value) if existing_value != candidate => {
                                tracing::warn!(sub = %sub, key = %key, "layer push overlap on non-content layer");
                                return Err(Error::Overlap { sub, key });
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        tracing::debug!(
            index = self.layers.len(),
            store_type = %store.store_type(),
            write_through = mark_write,
            "pushed layer onto stacked store"
        );
        self.layers.push(Layer::new(store, mark_write));
        Ok(())
    }

    /// The layers in push order; index 0 is always the write-through
    /// layer once the stack has at least one layer.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Every sub namespace seen across every layer.
    pub fn subs(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for layer in &self.layers {
            set.extend(layer.store.subs());
        }
        set.into_iter().collect()
    }

    /// The sorted union of keys in `sub` across every layer.
    pub fn keys(&self, sub: &str) -> Result<Vec<String>> {
        let mut set = BTreeSet::new();
        for layer in &self.layers {
            set.extend(layer.store.keys(sub)?);
        }
        Ok(set.into_iter().collect())
    }

    /// Load `(sub, key)` from the lowest-indexed layer that has it.
    pub fn load(&self, sub: &str, key: &str) -> Result<Value> {
        for layer in &self.layers {
            match layer.store.load(sub, key) {
                Ok(value) => return Ok(value),
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(Error::not_found(sub, key))
    }

    /// Save `(sub, key, value)` into the write-through layer.
    pub fn save(&self, sub: &str, key: &str, value: &Value) -> Result<()> {
        self.write_through_layer()?.store.save(sub, key, value)
    }

    /// Remove `(sub, key)` from the write-through layer.
    pub fn remove(&self, sub: &str, key: &str) -> Result<()> {
        self.write_through_layer()?.store.remove(sub, key)
    }

    fn write_through_layer(&self) -> Result<&Layer> {
        self.layers
            .first()
            .filter(|l| l.write_through)
            .ok_or_else(|| Error::config("stack has no write-through layer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provision_store::MemoryStore;
    use serde_json::json;

    fn mem() -> Arc<dyn PhysicalStore> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn s1_load_and_keys_from_basic_content() {
        let write = mem();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();

        let mut stack = StackedStore::new();
        stack.push(write, false, true).unwrap();
        stack.push(basic, false, false).unwrap();

        assert_eq!(stack.load("subnets", "s1").unwrap(), json!({"addr": "192.168.1.0"}));
        assert_eq!(stack.keys("subnets").unwrap(), vec!["s1".to_string()]);
    }

    #[test]
    fn s2_write_layer_shadows_and_unions() {
        let write = mem();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();

        let mut stack = StackedStore::new();
        stack.push(write, false, true).unwrap();
        stack.push(basic, false, false).unwrap();

        stack.save("subnets", "s2", &json!({"addr": "10.0.0.0"})).unwrap();

        assert_eq!(stack.keys("subnets").unwrap(), vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(stack.load("subnets", "s1").unwrap(), json!({"addr": "192.168.1.0"}));
    }

    #[test]
    fn overlap_with_equal_values_is_allowed() {
        let write = mem();
        write.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();

        let mut stack = StackedStore::new();
        stack.push(write, false, true).unwrap();
        assert!(stack.push(basic, false, false).is_ok());
    }

    #[test]
    fn overlap_with_different_values_is_rejected() {
        let write = mem();
        write.save("subnets", "s1", &json!({"addr": "192.168.1.99"})).unwrap();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "192.168.1.0"})).unwrap();

        let mut stack = StackedStore::new();
        stack.push(write, false, true).unwrap();
        let err = stack.push(basic, false, false).unwrap_err();
        assert!(matches!(err, Error::Overlap { .. }));
    }

    #[test]
    fn mark_content_shadows_silently_even_on_conflict() {
        let write = mem();
        write.save("subnets", "s1", &json!("writable")).unwrap();
        let saas = mem();
        saas.save("subnets", "s1", &json!("saas")).unwrap();

        let mut stack = StackedStore::new();
        stack.push(write, false, true).unwrap();
        stack.push(saas, true, false).unwrap();

        assert_eq!(stack.load("subnets", "s1").unwrap(), json!("writable"));
    }

    #[test]
    fn write_through_must_be_first_push() {
        let mut stack = StackedStore::new();
        stack.push(mem(), false, true).unwrap();
        let err = stack.push(mem(), false, true).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn save_without_write_through_layer_fails() {
        let stack = StackedStore::new();
        assert!(matches!(stack.save("subnets", "s1", &json!(1)), Err(Error::Config(_))));
    }

    #[test]
    fn keys_on_absent_sub_is_empty() {
        let mut stack = StackedStore::new();
        stack.push(mem(), false, true).unwrap();
        assert!(stack.keys("nope").unwrap().is_empty());
    }
}
