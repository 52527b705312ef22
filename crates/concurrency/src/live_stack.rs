//! Lock-free atomic pointer to "the current datastack" (spec §5,
//! "Live-stack pointer").

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Holds the currently-live value of `T` behind a lock-free read path.
///
/// Readers call [`LiveStack::load`] and pay no lock at all — `ArcSwap`
/// gives wait-free reads. Writers (composer mutation operations) build
/// a whole new `T` off to the side and call [`LiveStack::swap`] once it
/// validates; `swap_lock` serializes concurrent rebuild attempts so two
/// mutations can't race to replace the pointer from the same stale
/// starting point (spec §4.5's clone → mutate → rebuild → validate →
/// swap sequence is only atomic end-to-end if rebuilds are serialized).
pub struct LiveStack<T> {
    current: ArcSwap<T>,
    swap_lock: Mutex<()>,
}

impl<T> LiveStack<T> {
    /// Publish `initial` as the live value.
    pub fn new(initial: T) -> Self {
        LiveStack {
            current: ArcSwap::new(Arc::new(initial)),
            swap_lock: Mutex::new(()),
        }
    }

    /// Wait-free snapshot of the current value.
    pub fn load(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Acquire the rebuild serialization lock and return the snapshot a
    /// rebuild should start from.
    ///
    /// Holding the returned guard across the rebuild-and-validate phase
    /// prevents a second mutation from starting its own rebuild against
    /// the same stale snapshot; only drop it once the rebuilt value has
    /// either been installed via [`LiveStack::publish`] or discarded.
    pub fn begin_rebuild(&self) -> (Arc<T>, RebuildGuard<'_>) {
        let guard = self.swap_lock.lock();
        (self.current.load_full(), RebuildGuard(guard))
    }

    /// Install `new` as the live value. Must be called while holding the
    /// guard returned by [`LiveStack::begin_rebuild`].
    pub fn publish(&self, _guard: &RebuildGuard<'_>, new: T) -> Arc<T> {
        let new = Arc::new(new);
        self.current.store(new.clone());
        tracing::info!("published rebuilt datastack as the live snapshot");
        new
    }
}

/// RAII token proving the rebuild lock is held; dropping it releases
/// the lock without publishing anything (the rebuild was discarded).
pub struct RebuildGuard<'a>(parking_lot::MutexGuard<'a, ()>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_returns_initial_value() {
        let live = LiveStack::new(1u32);
        assert_eq!(*live.load(), 1);
    }

    #[test]
    fn publish_replaces_live_value() {
        let live = LiveStack::new(1u32);
        let (snapshot, guard) = live.begin_rebuild();
        assert_eq!(*snapshot, 1);
        live.publish(&guard, 2);
        drop(guard);
        assert_eq!(*live.load(), 2);
    }

    #[test]
    fn discarded_rebuild_leaves_value_unchanged() {
        let live = LiveStack::new(1u32);
        {
            let (_snapshot, _guard) = live.begin_rebuild();
            // validation failed; guard drops without publish
        }
        assert_eq!(*live.load(), 1);
    }

    #[test]
    fn readers_never_block_on_a_held_rebuild_guard() {
        let live = LiveStack::new(1u32);
        let (_snapshot, _guard) = live.begin_rebuild();
        assert_eq!(*live.load(), 1);
    }
}
