//! # Duplicate Resolution
//!
//! Groups a task collection by `(business_name, type, status)`, marks the most
//! recently created member of each group as the survivor and proposes the rest for
//! soft deletion. Selection is recomputed on every call; nothing is cached.

pub mod grouper;
pub mod plan;

pub use grouper::{find_groups, select_default_deletions, DuplicateGroup, GroupMember};
pub use plan::DeletionPlan;
