//! The six-slot role composition that rebuilds into a `StackedStore`
//! (spec §3 "Entity: DataStack", §4.3).

use crate::fixer;
use provision_core::{Error, Result};
use provision_stack::StackedStore;
use provision_store::PhysicalStore;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named role slots plus the stacked view rebuilt from them.
///
/// `saas_contents` and `plugin_contents` are `BTreeMap`s rather than a
/// hash map precisely so that iterating them for `build_stack` is
/// already in lexicographic name order — map iteration nondeterminism
/// is a correctness bug here (spec §9), not a style preference, so the
/// ordering is made structural instead of an extra sort step.
pub struct DataStack {
    pub(crate) write_content: Arc<dyn PhysicalStore>,
    pub(crate) local_content: Option<Arc<dyn PhysicalStore>>,
    pub(crate) saas_contents: BTreeMap<String, Arc<dyn PhysicalStore>>,
    pub(crate) default_content: Option<Arc<dyn PhysicalStore>>,
    pub(crate) plugin_contents: BTreeMap<String, Arc<dyn PhysicalStore>>,
    pub(crate) basic_content: Arc<dyn PhysicalStore>,
    stack: StackedStore,
}

impl DataStack {
    /// Build the initial, unbuilt data stack from its role slots. Call
    /// [`DataStack::build_stack`] before using [`DataStack::load`] et al.
    pub fn new(write_content: Arc<dyn PhysicalStore>, basic_content: Arc<dyn PhysicalStore>) -> Self {
        DataStack {
            write_content,
            local_content: None,
            saas_contents: BTreeMap::new(),
            default_content: None,
            plugin_contents: BTreeMap::new(),
            basic_content,
            stack: StackedStore::new(),
        }
    }

    /// Shallow-copy the role slots into a fresh, not-yet-built
    /// `DataStack`. Shared `PhysicalStore` handles are reference-counted
    /// clones, never reopened — a discarded clone must never close a
    /// store the original still references (spec §4.3 "Cloning rules").
    pub fn clone_roles(&self) -> Self {
        DataStack {
            write_content: self.write_content.clone(),
            local_content: self.local_content.clone(),
            saas_contents: self.saas_contents.clone(),
            default_content: self.default_content.clone(),
            plugin_contents: self.plugin_contents.clone(),
            basic_content: self.basic_content.clone(),
            stack: StackedStore::new(),
        }
    }

    /// Rebuild the stacked view from the current role slots in the
    /// fixed precedence order (spec §4.3, steps 1-6).
    pub fn build_stack(&mut self) -> Result<()> {
        let mut stack = StackedStore::new();
        stack.push(self.write_content.clone(), false, true)?;

        if let Some(local) = &self.local_content {
            stack.push(local.clone(), false, false)?;
        }

        for store in self.saas_contents.values() {
            stack.push(store.clone(), true, false)?;
        }

        if let Some(default) = &self.default_content {
            stack.push(default.clone(), false, false)?;
        }

        for store in self.plugin_contents.values() {
            stack.push(store.clone(), true, false)?;
        }

        match stack.push(self.basic_content.clone(), false, false) {
            Ok(()) => {}
            Err(Error::Overlap { .. }) => {
                let write_store = stack
                    .layers()
                    .first()
                    .map(|l| l.store.clone())
                    .ok_or_else(|| Error::config("stack has no write-through layer after build"))?;
                fixer::fix_basic(&write_store, &self.basic_content)?;
                stack.push(self.basic_content.clone(), false, false)?;
            }
            Err(e) => return Err(e),
        }

        self.stack = stack;
        Ok(())
    }

    /// The rebuilt stacked view. Empty (no layers) until `build_stack`
    /// has been called successfully at least once.
    pub fn stack(&self) -> &StackedStore {
        &self.stack
    }
}
