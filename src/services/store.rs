//! # Task Store Collaborator
//!
//! The engine never owns task persistence. Services talk to the system of record
//! through [`TaskStore`].

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::classification::DelayCriteriaTable;
use crate::error::TaskWorkflowResult;
use crate::logging::log_store_operation;
use crate::models::Task;

/// Outcome of a single soft delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoftDeleteOutcome {
    Deleted,
    /// The record was already tombstoned; treated as success
    AlreadyDeleted,
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Every task, active or tombstoned, belonging to one of `business_names`
    async fn fetch_tasks_by_business(
        &self,
        business_names: &[String],
    ) -> TaskWorkflowResult<Vec<Task>>;

    /// Current per-type delay thresholds
    async fn fetch_delay_criteria(&self) -> TaskWorkflowResult<DelayCriteriaTable>;

    /// Mark one record deleted. Unknown ids are [`crate::TaskWorkflowError::TaskNotFound`].
    async fn soft_delete(&self, task_id: Uuid) -> TaskWorkflowResult<SoftDeleteOutcome>;
}

/// Thresholds from the store, or the built-in table when the lookup fails
pub async fn resolve_delay_criteria(store: &dyn TaskStore) -> DelayCriteriaTable {
    match store.fetch_delay_criteria().await {
        Ok(table) => {
            for (task_type, criteria) in table.inverted_entries() {
                debug!(
                    task_type = %task_type,
                    delayed_days = criteria.delayed_days,
                    risky_days = criteria.risky_days,
                    "Delay criteria make at-risk unreachable"
                );
            }
            table
        }
        Err(e) => {
            warn!(error = %e, "Delay criteria lookup failed, using built-in thresholds");
            DelayCriteriaTable::default()
        }
    }
}

/// Fetch the businesses' tasks in fixed-size chunks, one spawned fetch per chunk.
/// Chunks share nothing; their task lists are merged after every fetch completes
/// and any failed chunk fails the call.
pub async fn fetch_tasks_chunked(
    store: &Arc<dyn TaskStore>,
    business_names: &[String],
    chunk_size: usize,
) -> TaskWorkflowResult<Vec<Task>> {
    let chunk_size = chunk_size.max(1);
    let handles: Vec<_> = business_names
        .chunks(chunk_size)
        .map(|chunk| {
            let store = Arc::clone(store);
            let chunk = chunk.to_vec();
            tokio::spawn(async move { store.fetch_tasks_by_business(&chunk).await })
        })
        .collect();

    let chunk_count = handles.len();
    debug!(
        chunk_count = chunk_count,
        chunk_size = chunk_size,
        "Fetching tasks in chunks"
    );

    let mut tasks = Vec::new();
    for result in join_all(handles).await {
        tasks.extend(result??);
    }

    log_store_operation(
        "fetch_tasks_by_business",
        tasks.len(),
        "ok",
        Some(&format!("{chunk_count} chunks")),
    );
    Ok(tasks)
}
