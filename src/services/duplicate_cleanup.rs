//! # Duplicate Cleanup Service
//!
//! Finds duplicate task records for a set of businesses and soft-deletes a
//! selection of them through the [`TaskStore`].
//!
//! Deletion is not transactional. Ids are split into fixed-size chunks processed
//! concurrently; within a chunk ids are deleted one after another. Each id gets its
//! own outcome and nothing already deleted is rolled back.
//!
//! Outcomes are sent back over a channel as each delete completes, so a chunk
//! whose worker dies part-way still reports the deletes it finished.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::store::{fetch_tasks_chunked, SoftDeleteOutcome, TaskStore};
use crate::config::EngineConfig;
use crate::constants::system;
use crate::deduplication::{find_groups, DeletionPlan, DuplicateGroup};
use crate::error::{TaskWorkflowError, TaskWorkflowResult};
use crate::logging::{log_error, log_store_operation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionFailure {
    pub task_id: Uuid,
    pub reason: String,
}

/// Aggregate result of a batch soft delete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchDeletionReport {
    pub success_count: usize,
    pub failed_count: usize,
    /// Included in `success_count`
    pub already_deleted_count: usize,
    pub failures: Vec<DeletionFailure>,
}

impl BatchDeletionReport {
    fn record(&mut self, task_id: Uuid, outcome: TaskWorkflowResult<SoftDeleteOutcome>) {
        match outcome {
            Ok(SoftDeleteOutcome::Deleted) => self.success_count += 1,
            Ok(SoftDeleteOutcome::AlreadyDeleted) => {
                self.success_count += 1;
                self.already_deleted_count += 1;
            }
            Err(e) => {
                self.failed_count += 1;
                self.failures.push(DeletionFailure {
                    task_id,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.success_count + self.failed_count
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }
}

/// Duplicate groups found for a set of businesses, with the deletion plan built
/// from them
#[derive(Debug, Clone, Default)]
pub struct DuplicateScan {
    pub groups: Vec<DuplicateGroup>,
    pub plan: DeletionPlan,
}

pub struct DuplicateCleanupService {
    store: Arc<dyn TaskStore>,
    chunk_size: usize,
    fetch_chunk_size: usize,
}

impl std::fmt::Debug for DuplicateCleanupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateCleanupService")
            .field("chunk_size", &self.chunk_size)
            .field("fetch_chunk_size", &self.fetch_chunk_size)
            .finish()
    }
}

impl DuplicateCleanupService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            chunk_size: system::DEFAULT_DELETION_CHUNK_SIZE,
            fetch_chunk_size: system::DEFAULT_SUMMARY_CHUNK_SIZE,
        }
    }

    pub fn from_config(store: Arc<dyn TaskStore>, config: &EngineConfig) -> Self {
        Self::new(store)
            .with_chunk_size(config.deletion_chunk_size)
            .with_fetch_chunk_size(config.summary_chunk_size)
    }

    /// Ids per deletion chunk
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Business names per fetch chunk during [`Self::scan`]
    pub fn with_fetch_chunk_size(mut self, fetch_chunk_size: usize) -> Self {
        self.fetch_chunk_size = fetch_chunk_size.max(1);
        self
    }

    /// Fetch the businesses' tasks in chunks and group live duplicates
    pub async fn scan(&self, business_names: &[String]) -> TaskWorkflowResult<DuplicateScan> {
        let tasks = fetch_tasks_chunked(&self.store, business_names, self.fetch_chunk_size).await?;
        let groups = find_groups(&tasks);
        let plan = DeletionPlan::from_groups(&groups);

        info!(
            business_count = business_names.len(),
            task_count = tasks.len(),
            group_count = groups.len(),
            candidate_count = plan.candidate_count(),
            "Scanned for duplicate tasks"
        );

        Ok(DuplicateScan { groups, plan })
    }

    /// Delete the plan's default selection, or the operator's picks narrowed to
    /// the plan's candidates
    pub async fn apply(
        &self,
        plan: &DeletionPlan,
        selection: Option<&[Uuid]>,
    ) -> BatchDeletionReport {
        let ids = match selection {
            Some(requested) => plan.restrict_to(requested),
            None => plan.default_selection(),
        };
        self.delete_batch(&ids).await
    }

    /// Soft-delete every id, chunk by chunk. Never fails as a whole; when a chunk's
    /// worker dies, only the ids it had not finished are reported as failed.
    pub async fn delete_batch(&self, task_ids: &[Uuid]) -> BatchDeletionReport {
        let chunks: Vec<Vec<Uuid>> = task_ids
            .chunks(self.chunk_size)
            .map(<[Uuid]>::to_vec)
            .collect();
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let handles: Vec<_> = chunks
            .iter()
            .cloned()
            .map(|chunk| {
                let store = Arc::clone(&self.store);
                let sender = sender.clone();
                tokio::spawn(async move {
                    for task_id in chunk {
                        let outcome = store.soft_delete(task_id).await;
                        // The receiver outlives every worker
                        let _ = sender.send((task_id, outcome));
                    }
                })
            })
            .collect();
        drop(sender);

        debug!(
            id_count = task_ids.len(),
            chunk_count = chunks.len(),
            chunk_size = self.chunk_size,
            "Deleting duplicate tasks in chunks"
        );

        let results = join_all(handles).await;

        let mut report = BatchDeletionReport::default();
        let mut finished = HashSet::with_capacity(task_ids.len());
        while let Ok((task_id, outcome)) = receiver.try_recv() {
            finished.insert(task_id);
            report.record(task_id, outcome);
        }

        for (chunk, result) in chunks.iter().zip(results) {
            let Err(join_error) = result else {
                continue;
            };
            let error = TaskWorkflowError::from(join_error);
            let unfinished: Vec<Uuid> = chunk
                .iter()
                .filter(|task_id| !finished.contains(*task_id))
                .copied()
                .collect();
            log_error(
                "duplicate_cleanup",
                "delete_batch",
                &error.to_string(),
                Some(&format!(
                    "{} of {} ids unfinished in failed chunk",
                    unfinished.len(),
                    chunk.len()
                )),
            );
            for task_id in unfinished {
                report.record(task_id, Err(error.clone()));
            }
        }

        if report.failed_count > 0 {
            warn!(
                success_count = report.success_count,
                failed_count = report.failed_count,
                "Batch deletion finished with failures"
            );
        } else {
            log_store_operation("soft_delete", report.success_count, "ok", None);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, TaskType};
    use crate::services::InMemoryTaskStore;
    use chrono::{Duration, TimeZone, Utc};

    fn duplicates(count: i64) -> Vec<Task> {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        (0..count)
            .map(|i| Task::new("Acme", TaskType::Dealer, "dealer_order", base + Duration::hours(i)))
            .collect()
    }

    #[test]
    fn test_report_counts() {
        let mut report = BatchDeletionReport::default();
        report.record(Uuid::new_v4(), Ok(SoftDeleteOutcome::Deleted));
        report.record(Uuid::new_v4(), Ok(SoftDeleteOutcome::AlreadyDeleted));
        report.record(
            Uuid::new_v4(),
            Err(TaskWorkflowError::store_error("soft_delete", "timeout")),
        );

        assert_eq!(report.success_count, 2);
        assert_eq!(report.already_deleted_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.total(), 3);
        assert!(!report.is_complete_success());
    }

    #[tokio::test]
    async fn test_scan_and_apply_default_selection() {
        let tasks = duplicates(5);
        let survivor = tasks[4].id;
        let store = Arc::new(InMemoryTaskStore::with_tasks(tasks));
        let service = DuplicateCleanupService::new(store.clone()).with_chunk_size(2);

        let scan = service.scan(&["Acme".to_string()]).await.unwrap();
        assert_eq!(scan.groups.len(), 1);
        assert_eq!(scan.plan.candidate_count(), 4);

        let report = service.apply(&scan.plan, None).await;
        assert_eq!(report.success_count, 4);
        assert!(report.is_complete_success());
        assert!(!store.get(&survivor).unwrap().record_state.is_deleted());

        let rescan = service.scan(&["Acme".to_string()]).await.unwrap();
        assert!(rescan.groups.is_empty());
    }
}
