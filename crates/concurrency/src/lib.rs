//! Atomic live-stack replacement and multi-sub entity locking for the
//! content datastack (spec §5).

#![warn(missing_docs)]

mod live_stack;
mod lock_ents;
mod sub;

pub use live_stack::{LiveStack, RebuildGuard};
pub use lock_ents::{LockEnts, LockedSubs};
pub use sub::SubView;
