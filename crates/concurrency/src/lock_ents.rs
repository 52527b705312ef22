//! Multi-sub entity locking for datastack consumers (spec §5, §6
//! "Consumer contract" — `LockEnts`).

use crate::sub::SubView;
use dashmap::DashMap;
use lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use provision_stack::StackedStore;
use std::sync::Arc;

/// Registry of one lock per sub name, created lazily on first use and
/// never removed (subs are a small, bounded, long-lived set — unlike
/// the teacher's per-branch locks, which are cleaned up because
/// branches churn).
#[derive(Default)]
pub struct LockEnts {
    registry: DashMap<String, Arc<Mutex<()>>>,
}

impl LockEnts {
    /// An empty registry.
    pub fn new() -> Self {
        LockEnts {
            registry: DashMap::new(),
        }
    }

    /// Lock every named sub against concurrent access by another
    /// `LockEnts::lock` call, in a globally consistent (lexicographic)
    /// order so that two callers locking the same set of subs can never
    /// deadlock regardless of the order they name them in.
    ///
    /// Returns a handle to the locked subs plus an RAII guard; the subs
    /// stay locked until the guard is dropped.
    pub fn lock<'a>(&self, stack: &'a StackedStore, subs: &[&str]) -> LockedSubs<'a> {
        let mut sorted: Vec<String> = subs.iter().map(|s| (*s).to_string()).collect();
        sorted.sort();
        sorted.dedup();

        tracing::debug!(subs = ?sorted, "acquiring entity locks");

        let guards: Vec<ArcMutexGuard<RawMutex, ()>> = sorted
            .iter()
            .map(|sub| {
                let lock = self
                    .registry
                    .entry(sub.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone();
                Mutex::lock_arc(&lock)
            })
            .collect();

        LockedSubs {
            stack,
            _guards: guards,
        }
    }
}

/// A set of subs held locked for the lifetime of this value.
pub struct LockedSubs<'a> {
    stack: &'a StackedStore,
    _guards: Vec<ArcMutexGuard<RawMutex, ()>>,
}

impl<'a> LockedSubs<'a> {
    /// A view over one of the locked subs.
    ///
    /// Requesting a sub that wasn't named in the `lock` call still
    /// returns a working view — it's just not actually protected by a
    /// held lock. Callers are expected to name every sub they touch.
    pub fn get(&self, sub: &str) -> SubView<'a> {
        SubView::new(self.stack, sub.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provision_store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc as StdArc;

    fn stack_with(sub: &str, key: &str, value: serde_json::Value) -> StackedStore {
        let store: StdArc<dyn provision_store::PhysicalStore> = StdArc::new(MemoryStore::new());
        store.save(sub, key, &value).unwrap();
        let mut stack = StackedStore::new();
        stack.push(store, false, true).unwrap();
        stack
    }

    #[test]
    fn lock_then_get_reads_through_to_the_stack() {
        let stack = stack_with("reservations", "r1", json!({"ip": "10.0.0.5"}));
        let locks = LockEnts::new();
        let locked = locks.lock(&stack, &["reservations", "subnets"]);
        let view = locked.get("reservations");
        assert_eq!(view.find("r1").unwrap(), json!({"ip": "10.0.0.5"}));
    }

    #[test]
    fn locking_the_same_subs_twice_sequentially_succeeds() {
        let stack = stack_with("reservations", "r1", json!(1));
        let locks = LockEnts::new();
        {
            let _locked = locks.lock(&stack, &["reservations"]);
        }
        let _locked_again = locks.lock(&stack, &["reservations"]);
    }

    #[test]
    fn lock_order_is_independent_of_caller_argument_order() {
        let stack = stack_with("reservations", "r1", json!(1));
        let locks = LockEnts::new();
        let _a = locks.lock(&stack, &["subnets", "reservations"]);
        drop(_a);
        let _b = locks.lock(&stack, &["reservations", "subnets"]);
    }

    proptest::proptest! {
        /// Generalizes `lock_order_is_independent_of_caller_argument_order`:
        /// any permutation of the same set of sub names must acquire and
        /// release cleanly, one permutation after another, since `lock`
        /// always canonicalizes to lexicographic acquisition order (spec §5).
        #[test]
        fn any_permutation_of_the_same_subs_locks_without_deadlock(
            mut subs in proptest::collection::hash_set("[a-z]{2,6}", 1..6),
            seed in 0u64..1000,
        ) {
            let mut subs: Vec<String> = subs.drain().collect();
            // deterministic pseudo-shuffle driven by the proptest-generated seed
            subs.sort_by_key(|s| {
                let mut hash = seed;
                for b in s.bytes() {
                    hash = hash.wrapping_mul(31).wrapping_add(b as u64);
                }
                hash
            });

            let stack = stack_with("reservations", "r1", json!(1));
            let locks = LockEnts::new();
            let refs: Vec<&str> = subs.iter().map(String::as_str).collect();

            for _ in 0..2 {
                let _locked = locks.lock(&stack, &refs);
            }
        }
    }
}
