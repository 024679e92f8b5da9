//! # Task Record
//!
//! Read-only view of a task as supplied by the persistence collaborator.
//!
//! The engine never owns these records; it classifies them. Field parsing is
//! deliberately forgiving: a garbled date or an unknown priority degrades to
//! `None`/default instead of rejecting the record, because classification must
//! never block the surrounding workflow.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use super::TaskType;
use crate::constants::status_groups;

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else becomes `None`.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;

    Ok(match value {
        Some(Value::String(raw)) => parse_date(&raw),
        _ => None,
    })
}

/// Parse a calendar date from the formats the store is known to emit
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).date_naive())
    })
}

/// Task priority, ordered from least to most urgent
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(from = "String", into = "String")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TaskPriority {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Normal,
        }
    }
}

impl From<TaskPriority> for String {
    fn from(value: TaskPriority) -> Self {
        value.as_str().to_string()
    }
}

/// Soft-delete tombstone. Only `Active -> Deleted` is reachable through this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    #[default]
    Active,
    Deleted,
}

impl RecordState {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Tombstone the record. Returns `false` when it was already deleted.
    pub fn mark_deleted(&mut self) -> bool {
        match self {
            Self::Active => {
                *self = Self::Deleted;
                true
            }
            Self::Deleted => false,
        }
    }
}

/// Key under which two tasks are considered duplicates of each other
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuplicateGroupKey {
    pub business_name: String,
    pub task_type: TaskType,
    pub status: String,
}

impl fmt::Display for DuplicateGroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.business_name, self.task_type, self.status)
    }
}

/// A task record as fetched from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub business_name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub status: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub record_state: RecordState,
}

impl Task {
    /// Minimal active task; remaining fields take their defaults
    pub fn new(
        business_name: impl Into<String>,
        task_type: TaskType,
        status: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_name: business_name.into(),
            task_type,
            status: status.into(),
            priority: TaskPriority::default(),
            assignees: Vec::new(),
            start_date: None,
            due_date: None,
            created_at,
            updated_at: None,
            completed_at: None,
            record_state: RecordState::Active,
        }
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    pub fn duplicate_key(&self) -> DuplicateGroupKey {
        DuplicateGroupKey {
            business_name: self.business_name.clone(),
            task_type: self.task_type,
            status: self.status.clone(),
        }
    }

    /// Whether the current status is terminal for schedule tracking
    pub fn is_completed(&self) -> bool {
        status_groups::is_completed_status(&self.status)
    }

    /// Latest of creation, update and completion timestamps
    pub fn last_updated_at(&self) -> DateTime<Utc> {
        [self.updated_at, self.completed_at]
            .into_iter()
            .flatten()
            .fold(self.created_at, |latest, ts| latest.max(ts))
    }
}
