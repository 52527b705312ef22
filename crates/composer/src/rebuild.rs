//! Atomic reconfiguration: clone the current roles, mutate one slot,
//! rebuild, validate, and hand back a candidate the caller swaps in on
//! success (spec §4.3 "Mutation operations", §4.6, §4.7).

use crate::{DataStack, Validator};
use provision_core::{Error, Result};
use provision_store::PhysicalStore;
use std::sync::Arc;

/// A hook that may adjust the candidate stack before a new SaaS or
/// plugin store is inserted into its slot — e.g. to fix up a conflict
/// the incoming store would otherwise cause (spec §4.3 step 2).
pub type FixerUpper = dyn Fn(&mut DataStack, &Arc<dyn PhysicalStore>) -> Result<()>;

/// The result of a successful rebuild: the new stack plus any
/// non-fatal validator warning.
pub struct RebuildOutcome {
    /// The freshly rebuilt and validated datastack.
    pub stack: DataStack,
    /// A validator soft error, if one was returned; does not indicate
    /// failure.
    pub soft: Option<Error>,
}

/// Rebuild `candidate`, validate it, and clean up `displaced` (the
/// physical store the mutation replaced or removed, if any) only once
/// validation has passed.
///
/// On a hard validator error, or on a `build_stack` failure, the
/// candidate is discarded and `displaced` is left untouched — per
/// spec §4.7, a failed rebuild mutates nothing.
pub fn rebuild(
    mut candidate: DataStack,
    displaced: Option<Arc<dyn PhysicalStore>>,
    validator: &dyn Validator,
) -> Result<RebuildOutcome> {
    if let Err(e) = candidate.build_stack() {
        return Err(Error::Validation(e.to_string()));
    }

    let (hard, soft) = validator.validate(&candidate);
    if let Some(hard_err) = hard {
        return Err(hard_err);
    }

    if let Some(old) = displaced {
        provision_store::cleanup(old.as_ref());
    }

    Ok(RebuildOutcome { stack: candidate, soft })
}

/// Add or replace the named SaaS content store.
pub fn add_replace_saas(
    current: &DataStack,
    name: &str,
    new_store: Arc<dyn PhysicalStore>,
    validator: &dyn Validator,
    fixup: Option<&FixerUpper>,
) -> Result<RebuildOutcome> {
    let mut candidate = current.clone_roles();
    if let Some(f) = fixup {
        f(&mut candidate, &new_store)?;
    }
    let displaced = candidate.saas_contents.insert(name.to_string(), new_store);
    rebuild(candidate, displaced, validator)
}

/// Remove the named SaaS content store, if present.
pub fn remove_saas(current: &DataStack, name: &str, validator: &dyn Validator) -> Result<RebuildOutcome> {
    let mut candidate = current.clone_roles();
    let displaced = candidate.saas_contents.remove(name);
    rebuild(candidate, displaced, validator)
}

/// Add or replace the named plugin content store.
pub fn add_replace_plugin(
    current: &DataStack,
    name: &str,
    new_store: Arc<dyn PhysicalStore>,
    validator: &dyn Validator,
    fixup: Option<&FixerUpper>,
) -> Result<RebuildOutcome> {
    let mut candidate = current.clone_roles();
    if let Some(f) = fixup {
        f(&mut candidate, &new_store)?;
    }
    let displaced = candidate.plugin_contents.insert(name.to_string(), new_store);
    rebuild(candidate, displaced, validator)
}

/// Remove the named plugin content store, if present.
pub fn remove_plugin(current: &DataStack, name: &str, validator: &dyn Validator) -> Result<RebuildOutcome> {
    let mut candidate = current.clone_roles();
    let displaced = candidate.plugin_contents.remove(name);
    rebuild(candidate, displaced, validator)
}
