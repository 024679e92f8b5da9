use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{DuplicateGroupKey, Task};

/// One task inside a duplicate group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Survivor flag; exactly one member per group carries it
    pub keep: bool,
}

/// Two or more tasks sharing business name, type and status.
///
/// Members are ordered most recent first, so the survivor is always `members[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub key: DuplicateGroupKey,
    pub members: Vec<GroupMember>,
    pub count: usize,
}

impl DuplicateGroup {
    pub fn survivor(&self) -> Option<&GroupMember> {
        self.members.iter().find(|member| member.keep)
    }

    /// Non-survivor ids, oldest first
    pub fn deletion_candidates(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.members
            .iter()
            .rev()
            .filter(|member| !member.keep)
            .map(|member| member.id)
    }
}

/// Partition `tasks` by duplicate key and keep partitions with more than one member.
///
/// Tombstoned records are not live duplicates and are skipped. Within a group the
/// most recently created task survives; equal timestamps fall back to the larger id
/// so the choice is stable across calls. Groups come back ordered by key.
pub fn find_groups(tasks: &[Task]) -> Vec<DuplicateGroup> {
    let mut partitions: BTreeMap<DuplicateGroupKey, Vec<&Task>> = BTreeMap::new();

    for task in tasks.iter().filter(|task| !task.record_state.is_deleted()) {
        partitions.entry(task.duplicate_key()).or_default().push(task);
    }

    partitions
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, mut members)| {
            members.sort_by_key(|task| Reverse((task.created_at, task.id)));

            let members: Vec<GroupMember> = members
                .into_iter()
                .enumerate()
                .map(|(index, task)| GroupMember {
                    id: task.id,
                    created_at: task.created_at,
                    keep: index == 0,
                })
                .collect();

            DuplicateGroup {
                count: members.len(),
                key,
                members,
            }
        })
        .collect()
}

/// Every non-survivor id across `groups`: the suggested, not mandatory, deletion set
pub fn select_default_deletions(groups: &[DuplicateGroup]) -> Vec<Uuid> {
    groups
        .iter()
        .flat_map(|group| group.deletion_candidates())
        .collect()
}
