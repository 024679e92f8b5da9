use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use super::grouper::{select_default_deletions, DuplicateGroup};

/// Deletion candidates derived from duplicate groups.
///
/// An operator may narrow the default selection before committing, but nothing
/// selected through a plan can ever include a group survivor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionPlan {
    candidates: Vec<Uuid>,
    survivors: HashSet<Uuid>,
}

impl DeletionPlan {
    pub fn from_groups(groups: &[DuplicateGroup]) -> Self {
        let survivors = groups
            .iter()
            .filter_map(DuplicateGroup::survivor)
            .map(|member| member.id)
            .collect();

        Self {
            candidates: select_default_deletions(groups),
            survivors,
        }
    }

    /// Every candidate, in suggested order
    pub fn default_selection(&self) -> Vec<Uuid> {
        self.candidates.clone()
    }

    /// Narrow to the ids an operator picked. Ids that are survivors or were never
    /// candidates are dropped; candidate order is preserved.
    pub fn restrict_to(&self, requested: &[Uuid]) -> Vec<Uuid> {
        let requested: HashSet<&Uuid> = requested.iter().collect();

        for &id in &requested {
            if self.candidates.contains(id) {
                continue;
            }
            if self.survivors.contains(id) {
                debug!(task_id = %id, "Refusing to select duplicate group survivor for deletion");
            } else {
                debug!(task_id = %id, "Ignoring id that is not a deletion candidate");
            }
        }

        self.candidates
            .iter()
            .filter(|id| requested.contains(id))
            .copied()
            .collect()
    }

    pub fn is_survivor(&self, id: &Uuid) -> bool {
        self.survivors.contains(id)
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
