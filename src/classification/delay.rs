//! # Schedule Health Classification
//!
//! Classifies a task as on-time, at-risk or delayed from the days elapsed since its
//! start date, using per-type thresholds.
//!
//! ## Threshold ordering
//!
//! The delayed threshold is checked before the risky threshold. Every default entry
//! has `delayed_days < risky_days`, so under the defaults a task reaches `Delayed`
//! before it could ever be `AtRisk` and the `AtRisk` branch is unreachable. The order
//! and the defaults are kept as deployed pending product clarification;
//! [`DelayCriteria::is_inverted`] lets callers surface the condition.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::constants::status_groups;
use crate::models::{Task, TaskType};

/// Schedule health of a single task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleHealth {
    OnTime,
    AtRisk,
    Delayed,
}

impl ScheduleHealth {
    pub fn is_problematic(&self) -> bool {
        !matches!(self, Self::OnTime)
    }
}

impl fmt::Display for ScheduleHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTime => write!(f, "on_time"),
            Self::AtRisk => write!(f, "at_risk"),
            Self::Delayed => write!(f, "delayed"),
        }
    }
}

/// Result of classifying one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayAssessment {
    pub health: ScheduleHealth,
    /// Days past the delayed threshold; 0 unless `health` is `Delayed`
    pub overdue_days: i64,
}

impl DelayAssessment {
    pub const ON_TIME: Self = Self {
        health: ScheduleHealth::OnTime,
        overdue_days: 0,
    };
}

/// Day thresholds for one task type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayCriteria {
    pub delayed_days: i64,
    pub risky_days: i64,
}

impl DelayCriteria {
    pub const fn new(delayed_days: i64, risky_days: i64) -> Self {
        Self {
            delayed_days,
            risky_days,
        }
    }

    /// True when `AtRisk` cannot be reached because the delayed threshold is lower
    pub fn is_inverted(&self) -> bool {
        self.delayed_days < self.risky_days
    }
}

const DEFAULT_ETC_CRITERIA: DelayCriteria = DelayCriteria::new(7, 10);

/// Per-type thresholds. Types without an entry use the `etc` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, DelayCriteria>", into = "HashMap<String, DelayCriteria>")]
pub struct DelayCriteriaTable {
    entries: HashMap<TaskType, DelayCriteria>,
}

impl DelayCriteriaTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(mut self, task_type: TaskType, criteria: DelayCriteria) -> Self {
        self.entries.insert(task_type, criteria);
        self
    }

    /// Dedicated entry for a type, without fallback
    pub fn entry(&self, task_type: TaskType) -> Option<DelayCriteria> {
        self.entries.get(&task_type).copied()
    }

    /// Thresholds for a type, falling back to the `etc` entry
    pub fn for_type(&self, task_type: TaskType) -> DelayCriteria {
        self.entry(task_type)
            .or_else(|| self.entry(TaskType::Etc))
            .unwrap_or(DEFAULT_ETC_CRITERIA)
    }

    /// Types whose dedicated entry makes `AtRisk` unreachable
    pub fn inverted_entries(&self) -> Vec<(TaskType, DelayCriteria)> {
        let mut inverted: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, criteria)| criteria.is_inverted())
            .map(|(task_type, criteria)| (*task_type, *criteria))
            .collect();
        inverted.sort_by_key(|(task_type, _)| *task_type);
        inverted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DelayCriteriaTable {
    /// The built-in table; `dealer` and `outsourcing` intentionally have no entry
    fn default() -> Self {
        Self::empty()
            .with_entry(TaskType::SelfFunded, DelayCriteria::new(7, 14))
            .with_entry(TaskType::Subsidy, DelayCriteria::new(14, 20))
            .with_entry(TaskType::AfterService, DelayCriteria::new(3, 7))
            .with_entry(TaskType::Etc, DEFAULT_ETC_CRITERIA)
    }
}

impl From<HashMap<String, DelayCriteria>> for DelayCriteriaTable {
    /// Keys are wire type names; unknown keys are dropped rather than folded into `etc`
    fn from(raw: HashMap<String, DelayCriteria>) -> Self {
        let mut table = Self::empty();
        for (key, criteria) in raw {
            match key.parse::<TaskType>() {
                Ok(task_type) => table.entries.insert(task_type, criteria),
                Err(_) => {
                    debug!(key = %key, "Ignoring delay criteria for unknown task type");
                    continue;
                }
            };
        }
        table
    }
}

impl From<DelayCriteriaTable> for HashMap<String, DelayCriteria> {
    fn from(table: DelayCriteriaTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(task_type, criteria)| (task_type.as_str().to_string(), criteria))
            .collect()
    }
}

/// Classify against an explicit clock.
///
/// Total and side-effect free: completed statuses, a missing start date and a start
/// date in the future all classify as on-time.
pub fn classify_at(
    now: DateTime<Utc>,
    start_date: Option<NaiveDate>,
    task_type: TaskType,
    status: &str,
    criteria: &DelayCriteriaTable,
) -> DelayAssessment {
    if status_groups::is_completed_status(status) {
        return DelayAssessment::ON_TIME;
    }

    let Some(start_date) = start_date else {
        return DelayAssessment::ON_TIME;
    };

    // Whole days since midnight UTC of the start date
    let elapsed_days = now.date_naive().signed_duration_since(start_date).num_days();
    if elapsed_days < 0 {
        return DelayAssessment::ON_TIME;
    }

    let thresholds = criteria.for_type(task_type);

    if elapsed_days >= thresholds.delayed_days {
        DelayAssessment {
            health: ScheduleHealth::Delayed,
            overdue_days: elapsed_days.saturating_sub(thresholds.delayed_days),
        }
    } else if elapsed_days >= thresholds.risky_days {
        DelayAssessment {
            health: ScheduleHealth::AtRisk,
            overdue_days: 0,
        }
    } else {
        DelayAssessment::ON_TIME
    }
}

/// Classify against the wall clock
pub fn classify(
    start_date: Option<NaiveDate>,
    task_type: TaskType,
    status: &str,
    criteria: &DelayCriteriaTable,
) -> DelayAssessment {
    classify_at(Utc::now(), start_date, task_type, status, criteria)
}

pub fn classify_task_at(
    now: DateTime<Utc>,
    task: &Task,
    criteria: &DelayCriteriaTable,
) -> DelayAssessment {
    classify_at(now, task.start_date, task.task_type, &task.status, criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn days_ago(days: i64) -> Option<NaiveDate> {
        Some((now() - Duration::days(days)).date_naive())
    }

    #[test]
    fn test_default_table() {
        let table = DelayCriteriaTable::default();
        assert_eq!(table.for_type(TaskType::SelfFunded), DelayCriteria::new(7, 14));
        assert_eq!(table.for_type(TaskType::Subsidy), DelayCriteria::new(14, 20));
        assert_eq!(table.for_type(TaskType::AfterService), DelayCriteria::new(3, 7));
        assert_eq!(table.for_type(TaskType::Dealer), DelayCriteria::new(7, 10));
        assert_eq!(table.for_type(TaskType::Outsourcing), DelayCriteria::new(7, 10));
        assert!(table.entry(TaskType::Dealer).is_none());
    }

    #[test]
    fn test_delayed_with_overdue_days() {
        let assessment = classify_at(
            now(),
            days_ago(10),
            TaskType::SelfFunded,
            "self_site_inspection",
            &DelayCriteriaTable::default(),
        );
        assert_eq!(assessment.health, ScheduleHealth::Delayed);
        assert_eq!(assessment.overdue_days, 3);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let table = DelayCriteriaTable::default();
        let at = classify_at(now(), days_ago(7), TaskType::SelfFunded, "self_contract", &table);
        assert_eq!(at, DelayAssessment { health: ScheduleHealth::Delayed, overdue_days: 0 });

        let before = classify_at(now(), days_ago(6), TaskType::SelfFunded, "self_contract", &table);
        assert_eq!(before, DelayAssessment::ON_TIME);
        assert!(at.health.is_problematic());
        assert!(!before.health.is_problematic());
    }

    #[test]
    fn test_at_risk_reachable_only_with_ordered_thresholds() {
        let table =
            DelayCriteriaTable::empty().with_entry(TaskType::Etc, DelayCriteria::new(10, 5));
        let assessment = classify_at(now(), days_ago(6), TaskType::Dealer, "dealer_order", &table);
        assert_eq!(assessment.health, ScheduleHealth::AtRisk);
        assert_eq!(assessment.overdue_days, 0);

        // Defaults are inverted: 13 days for self is already delayed, never at risk
        let default = DelayCriteriaTable::default();
        for days in 0..40 {
            let health =
                classify_at(now(), days_ago(days), TaskType::SelfFunded, "self_design", &default)
                    .health;
            assert_ne!(health, ScheduleHealth::AtRisk);
        }
    }

    #[test]
    fn test_completed_status_is_never_late() {
        let assessment = classify_at(
            now(),
            days_ago(3650),
            TaskType::Subsidy,
            "subsidy_payment",
            &DelayCriteriaTable::default(),
        );
        assert_eq!(assessment, DelayAssessment::ON_TIME);
    }

    #[test]
    fn test_missing_and_future_start_dates() {
        let table = DelayCriteriaTable::default();
        assert_eq!(
            classify_at(now(), None, TaskType::AfterService, "as_visit", &table),
            DelayAssessment::ON_TIME
        );
        assert_eq!(
            classify_at(now(), days_ago(-1), TaskType::AfterService, "as_visit", &table),
            DelayAssessment::ON_TIME
        );
    }

    #[test]
    fn test_future_start_guard_with_zero_threshold() {
        let table = DelayCriteriaTable::empty().with_entry(TaskType::Etc, DelayCriteria::new(0, 0));
        let tomorrow = Some(now().date_naive() + Duration::days(1));
        assert_eq!(
            classify_at(now(), tomorrow, TaskType::Etc, "etc_in_progress", &table),
            DelayAssessment::ON_TIME
        );
        // Same-day start is elapsed 0 and meets a zero threshold
        let today = Some(now().date_naive());
        assert_eq!(
            classify_at(now(), today, TaskType::Etc, "etc_in_progress", &table).health,
            ScheduleHealth::Delayed
        );
    }

    #[test]
    fn test_extreme_thresholds_saturate() {
        let lowest =
            DelayCriteriaTable::empty().with_entry(TaskType::Etc, DelayCriteria::new(i64::MIN, 0));
        let assessment =
            classify_at(now(), days_ago(0), TaskType::Etc, "etc_in_progress", &lowest);
        assert_eq!(assessment.health, ScheduleHealth::Delayed);
        assert_eq!(assessment.overdue_days, i64::MAX);

        let highest = DelayCriteriaTable::empty()
            .with_entry(TaskType::Etc, DelayCriteria::new(i64::MAX, i64::MAX));
        let assessment =
            classify_at(now(), days_ago(36500), TaskType::Etc, "etc_in_progress", &highest);
        assert_eq!(assessment, DelayAssessment::ON_TIME);
    }

    #[test]
    fn test_missing_etc_entry_uses_builtin_etc() {
        let table = DelayCriteriaTable::empty();
        assert_eq!(table.for_type(TaskType::Dealer), DelayCriteria::new(7, 10));
    }

    #[test]
    fn test_inverted_entries_flagged() {
        let inverted = DelayCriteriaTable::default().inverted_entries();
        let types: Vec<TaskType> = inverted.iter().map(|(t, _)| *t).collect();
        assert_eq!(
            types,
            vec![TaskType::SelfFunded, TaskType::Subsidy, TaskType::Etc, TaskType::AfterService]
        );
    }

    #[test]
    fn test_table_serde_uses_wire_keys_and_drops_unknown() {
        let json = serde_json::json!({
            "self": { "delayed_days": 5, "risky_days": 2 },
            "warranty": { "delayed_days": 1, "risky_days": 1 }
        });
        let table: DelayCriteriaTable = serde_json::from_value(json).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.for_type(TaskType::SelfFunded), DelayCriteria::new(5, 2));
        assert_eq!(table.for_type(TaskType::Etc), DelayCriteria::new(7, 10));
    }
}
