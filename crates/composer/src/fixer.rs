//! Reconciles the writable layer against immutable basic content when
//! a rebuild's final push overlaps it (spec §4.4).

use provision_core::{Error, Result};
use provision_store::PhysicalStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Remove from `write` every (sub, key) that also exists in `basic`
/// with a structurally equal value, so that `write` no longer shadows
/// content the binary now ships as immutable ground truth.
///
/// Fails with `Error::ImmutableConflict` on the first (sub, key) whose
/// writable value differs from the basic one — nothing is removed in
/// that case, matching spec §4.4 step 5 ("remove nothing").
///
/// A writable value that fails to deserialize is surfaced as whatever
/// error its store reports (`Error::Io` for a corrupt on-disk value),
/// not silently treated as absent — only a genuinely missing key
/// (`Error::NotFound`) is skipped. This resolves the open question in
/// spec §9: the reference fixer conflated "absent" with "corrupt".
pub fn fix_basic(write: &Arc<dyn PhysicalStore>, basic: &Arc<dyn PhysicalStore>) -> Result<()> {
    let write_subs: BTreeSet<String> = write.subs().into_iter().collect();
    let mut to_remove = Vec::new();

    for sub in basic.subs() {
        if !write_subs.contains(&sub) {
            continue;
        }

        for key in basic.keys(&sub)? {
            let write_value = match write.load(&sub, &key) {
                Ok(value) => value,
                Err(Error::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            let basic_value = basic.load(&sub, &key)?;

            if write_value != basic_value {
                return Err(Error::ImmutableConflict { sub, key });
            }

            tracing::info!(sub = %sub, key = %key, "fixer: replacing writable copy with immutable basic content");
            to_remove.push((sub.clone(), key));
        }
    }

    for (sub, key) in to_remove {
        write.remove(&sub, &key)?;
    }
    Ok(())
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
    fn removes_equal_writable_copies() {
        let write = mem();
        write.save("subnets", "s1", &json!({"addr": "1.2.3.0"})).unwrap();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "1.2.3.0"})).unwrap();

        fix_basic(&write, &basic).unwrap();

        assert!(matches!(write.load("subnets", "s1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn rejects_divergent_values_and_removes_nothing() {
        let write = mem();
        write.save("subnets", "s1", &json!({"addr": "9.9.9.9"})).unwrap();
        write.save("subnets", "s0", &json!({"addr": "leave-me"})).unwrap();
        let basic = mem();
        basic.save("subnets", "s0", &json!({"addr": "leave-me"})).unwrap();
        basic.save("subnets", "s1", &json!({"addr": "1.2.3.0"})).unwrap();

        let err = fix_basic(&write, &basic).unwrap_err();
        assert!(matches!(err, Error::ImmutableConflict { .. }));
        // nothing removed, even entries that matched before the conflict
        assert_eq!(write.load("subnets", "s0").unwrap(), json!({"addr": "leave-me"}));
    }

    #[test]
    fn skips_keys_absent_from_the_writable_sub() {
        let write = mem();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "1.2.3.0"})).unwrap();

        fix_basic(&write, &basic).unwrap();
    }

    #[test]
    fn skips_entire_subs_absent_from_the_writable_store() {
        let write = mem();
        write.save("machines", "m1", &json!(1)).unwrap();
        let basic = mem();
        basic.save("subnets", "s1", &json!({"addr": "1.2.3.0"})).unwrap();

        fix_basic(&write, &basic).unwrap();
        assert_eq!(write.load("machines", "m1").unwrap(), json!(1));
    }
}
