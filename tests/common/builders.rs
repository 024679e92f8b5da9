//! Task fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use task_workflow::models::{RecordState, Task, TaskPriority, TaskType};
use uuid::Uuid;

/// Fixed reference instant so date arithmetic in tests is deterministic
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Builder pattern for test tasks
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(business_name: &str, task_type: TaskType, status: &str) -> Self {
        Self {
            task: Task::new(business_name, task_type, status, reference_now() - Duration::days(30)),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.task.id = id;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.task.created_at = created_at;
        self
    }

    pub fn created_days_ago(self, days: i64) -> Self {
        self.created_at(reference_now() - Duration::days(days))
    }

    pub fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.task.updated_at = Some(updated_at);
        self
    }

    pub fn started(mut self, start_date: NaiveDate) -> Self {
        self.task.start_date = Some(start_date);
        self
    }

    pub fn started_days_ago(self, days: i64) -> Self {
        let start = reference_now().date_naive() - Duration::days(days);
        self.started(start)
    }

    pub fn priority(mut self, priority: TaskPriority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.task.record_state = RecordState::Deleted;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
