//! # Business Summary Service
//!
//! Batch classification entry point: one status summary per business, built from
//! the business's tasks fetched through the [`TaskStore`].
//!
//! Business names are fetched in fixed-size chunks, one spawned future per chunk.
//! Chunks share nothing; their task lists are merged after every fetch completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::store::{fetch_tasks_chunked, resolve_delay_criteria, TaskStore};
use crate::classification::{classify_task_at, DelayAssessment, DelayCriteriaTable};
use crate::config::EngineConfig;
use crate::constants::system;
use crate::error::TaskWorkflowResult;
use crate::models::{Task, TaskType};
use crate::registry::StepRegistry;

/// Status snapshot of one business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessStatusSummary {
    pub business_name: String,
    /// Task the status was taken from
    pub task_id: Option<Uuid>,
    pub task_type: Option<TaskType>,
    pub status: Option<String>,
    pub label: String,
    pub color_token: String,
    pub progress_percent: u8,
    pub delay: DelayAssessment,
    /// Most recent change across all of the business's tasks
    pub last_updated_at: Option<DateTime<Utc>>,
    /// Tasks whose status is not terminal
    pub active_task_count: usize,
}

impl BusinessStatusSummary {
    /// Summary for a business with no live tasks
    pub fn unregistered(business_name: impl Into<String>) -> Self {
        Self {
            business_name: business_name.into(),
            task_id: None,
            task_type: None,
            status: None,
            label: system::NO_TASKS_LABEL.to_string(),
            color_token: system::FALLBACK_COLOR_TOKEN.to_string(),
            progress_percent: 0,
            delay: DelayAssessment::ON_TIME,
            last_updated_at: None,
            active_task_count: 0,
        }
    }

    pub fn has_tasks(&self) -> bool {
        self.task_id.is_some()
    }
}

/// The task that represents a business: highest-priority active task (newest
/// first on ties), else the most recently updated task.
pub fn representative_task(tasks: &[Task]) -> Option<&Task> {
    let top_active = tasks
        .iter()
        .filter(|task| !task.is_completed())
        .max_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

    top_active.or_else(|| {
        tasks
            .iter()
            .max_by(|a, b| {
                a.last_updated_at()
                    .cmp(&b.last_updated_at())
                    .then(a.id.cmp(&b.id))
            })
    })
}

/// Summarize one business from its live tasks
pub fn summarize_business(
    registry: &StepRegistry,
    now: DateTime<Utc>,
    business_name: &str,
    tasks: &[Task],
    criteria: &DelayCriteriaTable,
) -> BusinessStatusSummary {
    let Some(task) = representative_task(tasks) else {
        return BusinessStatusSummary::unregistered(business_name);
    };

    BusinessStatusSummary {
        business_name: business_name.to_string(),
        task_id: Some(task.id),
        task_type: Some(task.task_type),
        status: Some(task.status.clone()),
        label: registry.label(task.task_type, &task.status).into_owned(),
        color_token: registry.color_token(task.task_type, &task.status).to_string(),
        progress_percent: registry.progress_percent(task.task_type, &task.status),
        delay: classify_task_at(now, task, criteria),
        last_updated_at: tasks.iter().map(Task::last_updated_at).max(),
        active_task_count: tasks.iter().filter(|t| !t.is_completed()).count(),
    }
}

pub struct BusinessSummaryService {
    store: Arc<dyn TaskStore>,
    registry: &'static StepRegistry,
    chunk_size: usize,
}

impl std::fmt::Debug for BusinessSummaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessSummaryService")
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl BusinessSummaryService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            registry: StepRegistry::global(),
            chunk_size: system::DEFAULT_SUMMARY_CHUNK_SIZE,
        }
    }

    pub fn from_config(store: Arc<dyn TaskStore>, config: &EngineConfig) -> Self {
        Self::new(store).with_chunk_size(config.summary_chunk_size)
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub async fn summarize(
        &self,
        business_names: &[String],
    ) -> TaskWorkflowResult<Vec<BusinessStatusSummary>> {
        self.summarize_at(Utc::now(), business_names).await
    }

    /// One summary per distinct input name, in first-seen order. A failed fetch
    /// fails the whole call.
    pub async fn summarize_at(
        &self,
        now: DateTime<Utc>,
        business_names: &[String],
    ) -> TaskWorkflowResult<Vec<BusinessStatusSummary>> {
        let mut seen = HashSet::new();
        let names: Vec<String> = business_names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect();

        if names.is_empty() {
            return Ok(Vec::new());
        }

        let criteria = resolve_delay_criteria(self.store.as_ref()).await;
        let tasks = fetch_tasks_chunked(&self.store, &names, self.chunk_size).await?;
        let task_count = tasks.len();

        let mut by_business: HashMap<String, Vec<Task>> = HashMap::with_capacity(seen.len());
        for task in tasks {
            if task.record_state.is_deleted() || !seen.contains(task.business_name.as_str()) {
                continue;
            }
            by_business.entry(task.business_name.clone()).or_default().push(task);
        }

        let summaries: Vec<BusinessStatusSummary> = names
            .iter()
            .map(|name| {
                let tasks = by_business.get(name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                summarize_business(self.registry, now, name, tasks, &criteria)
            })
            .collect();

        info!(
            business_count = summaries.len(),
            task_count = task_count,
            unregistered = summaries.iter().filter(|s| !s.has_tasks()).count(),
            problematic = summaries.iter().filter(|s| s.delay.health.is_problematic()).count(),
            "Built business status summaries"
        );

        Ok(summaries)
    }
}
