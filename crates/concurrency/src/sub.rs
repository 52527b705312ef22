//! The consumer-facing view over one sub of a locked stack (spec §6,
//! "Consumer contract" — `d("reservations").Items()` style access).

use provision_core::{Error, Result, Value};
use provision_stack::StackedStore;

/// A read/write view scoped to a single sub namespace of a
/// [`StackedStore`](provision_stack::StackedStore).
///
/// Obtained from [`crate::LockedSubs::get`]; every method here is a
/// thin pass-through to the stack's lowest-index-wins read path and
/// write-through-only write path (spec §4.2), scoped to `sub`.
pub struct SubView<'a> {
    stack: &'a StackedStore,
    sub: String,
}

impl<'a> SubView<'a> {
    pub(crate) fn new(stack: &'a StackedStore, sub: String) -> Self {
        SubView { stack, sub }
    }

    /// Every item currently visible in this sub, keyed by name.
    pub fn items(&self) -> Result<Vec<(String, Value)>> {
        self.stack
            .keys(&self.sub)?
            .into_iter()
            .map(|key| {
                let value = self.stack.load(&self.sub, &key)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Look up a single key.
    pub fn find(&self, key: &str) -> Result<Value> {
        self.stack.load(&self.sub, key)
    }

    /// Create a new item; fails if `key` already exists anywhere in the
    /// stack (including in read-only content layers).
    pub fn create(&self, key: &str, value: &Value) -> Result<()> {
        match self.stack.load(&self.sub, key) {
            Ok(_) => Err(Error::Validation(format!(
                "{}/{} already exists",
                self.sub, key
            ))),
            Err(Error::NotFound(_)) => self.stack.save(&self.sub, key, value),
            Err(e) => Err(e),
        }
    }

    /// Overwrite an existing item's value in the write-through layer.
    ///
    /// Unlike [`SubView::create`], this does not require the key to be
    /// absent first — it's legal to shadow a value inherited from a
    /// read-only content layer.
    pub fn update(&self, key: &str, value: &Value) -> Result<()> {
        self.stack.save(&self.sub, key, value)
    }

    /// Remove an item from the write-through layer.
    pub fn delete(&self, key: &str) -> Result<()> {
        self.stack.remove(&self.sub, key)
    }
}
