//! # Step Registry
//!
//! Process-wide, read-only index over the lifecycle step tables.
//!
//! ## Architecture
//!
//! Two lookup levels are built once at first use:
//!
//! ```text
//! StepRegistry
//! ├── tables     [StepTable; 6] keyed by TaskType      (tier 1: exact type lookup)
//! └── by_status  HashMap<status, &StepDefinition>      (tier 2: cross-type fallback)
//! ```
//!
//! The flattened index tolerates records whose type and status were written under
//! an older mapping. When two tables share a status the table that comes first in
//! [`TaskType::ALL`] wins.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::step_tables;
use crate::models::TaskType;

static GLOBAL_REGISTRY: OnceLock<StepRegistry> = OnceLock::new();

/// One lifecycle step: status string, display label and opaque color token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StepDefinition {
    pub status: &'static str,
    pub label: &'static str,
    pub color_token: &'static str,
}

/// Zero-based position of a status inside its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepPosition {
    pub index: usize,
    pub total: usize,
}

impl StepPosition {
    /// One-based step number
    pub fn ordinal(&self) -> usize {
        self.index + 1
    }
}

/// Ordered, non-empty step sequence for one task type. Index 0 is the earliest step.
#[derive(Debug, Clone, Copy)]
pub struct StepTable {
    task_type: TaskType,
    steps: &'static [StepDefinition],
}

impl StepTable {
    fn new(task_type: TaskType, steps: &'static [StepDefinition]) -> Self {
        debug_assert!(!steps.is_empty(), "step table for {task_type} is empty");
        Self { task_type, steps }
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn steps(&self) -> &'static [StepDefinition] {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static StepDefinition> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, StepDefinition> {
        self.steps.iter()
    }

    /// Exact-match lookup within this table only
    pub fn find(&self, status: &str) -> Option<&'static StepDefinition> {
        self.steps.iter().find(|step| step.status == status)
    }

    pub fn position(&self, status: &str) -> Option<StepPosition> {
        self.steps
            .iter()
            .position(|step| step.status == status)
            .map(|index| StepPosition {
                index,
                total: self.steps.len(),
            })
    }

    pub fn contains(&self, status: &str) -> bool {
        self.find(status).is_some()
    }
}

/// Immutable registry of every step table plus the flattened status index
#[derive(Debug)]
pub struct StepRegistry {
    tables: [StepTable; 6],
    by_status: HashMap<&'static str, &'static StepDefinition>,
}

impl StepRegistry {
    /// Build the registry from the fixed step tables
    pub fn new() -> Self {
        let tables = TaskType::ALL
            .map(|task_type| StepTable::new(task_type, Self::table_data(task_type)));

        let mut by_status = HashMap::new();
        for task_type in TaskType::ALL {
            for step in Self::table_data(task_type) {
                by_status.entry(step.status).or_insert(step);
            }
        }

        Self { tables, by_status }
    }

    /// Shared instance, built on first access
    pub fn global() -> &'static StepRegistry {
        GLOBAL_REGISTRY.get_or_init(StepRegistry::new)
    }

    fn table_data(task_type: TaskType) -> &'static [StepDefinition] {
        match task_type {
            TaskType::SelfFunded => step_tables::SELF_STEPS,
            TaskType::Subsidy => step_tables::SUBSIDY_STEPS,
            TaskType::Etc => step_tables::ETC_STEPS,
            TaskType::AfterService => step_tables::AS_STEPS,
            TaskType::Dealer => step_tables::DEALER_STEPS,
            TaskType::Outsourcing => step_tables::OUTSOURCING_STEPS,
        }
    }

    /// Step table for a type. Total: every `TaskType` owns a table.
    pub fn steps_for(&self, task_type: TaskType) -> &StepTable {
        &self.tables[task_type.registry_index()]
    }

    /// Step table for a raw wire type; unknown values resolve to `etc`
    pub fn steps_for_raw(&self, task_type: &str) -> &StepTable {
        self.steps_for(TaskType::parse_lossy(task_type))
    }

    /// Any table's definition of `status`, regardless of type
    pub fn find_any(&self, status: &str) -> Option<&'static StepDefinition> {
        self.by_status.get(status).copied()
    }

    /// Tier-1 then tier-2 lookup
    pub fn resolve(&self, task_type: TaskType, status: &str) -> Option<&'static StepDefinition> {
        self.steps_for(task_type)
            .find(status)
            .or_else(|| self.find_any(status))
    }

    pub fn position(&self, task_type: TaskType, status: &str) -> Option<StepPosition> {
        self.steps_for(task_type).position(status)
    }

    /// The step after `status` in its type's table, if any
    pub fn next_step(
        &self,
        task_type: TaskType,
        status: &str,
    ) -> Option<&'static StepDefinition> {
        let table = self.steps_for(task_type);
        table
            .position(status)
            .and_then(|position| table.get(position.index + 1))
    }

    /// Every step of every table, in registry order
    pub fn all_steps(&self) -> impl Iterator<Item = (TaskType, &'static StepDefinition)> + '_ {
        TaskType::ALL.into_iter().flat_map(|task_type| {
            Self::table_data(task_type)
                .iter()
                .map(move |step| (task_type, step))
        })
    }

    pub fn total_steps(&self) -> usize {
        self.tables.iter().map(StepTable::len).sum()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Step table for `task_type` from the shared registry
pub fn steps_for(task_type: TaskType) -> &'static StepTable {
    StepRegistry::global().steps_for(task_type)
}
