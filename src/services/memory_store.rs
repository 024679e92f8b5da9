use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::store::{SoftDeleteOutcome, TaskStore};
use crate::classification::DelayCriteriaTable;
use crate::error::{TaskWorkflowError, TaskWorkflowResult};
use crate::models::Task;

/// Concurrent in-process [`TaskStore`].
///
/// Backs the CLI and tests. Failures can be injected per id, and the criteria
/// lookup can be made to fail, to exercise partial-failure paths.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: DashMap<Uuid, Task>,
    criteria: RwLock<Option<DelayCriteriaTable>>,
    failing_deletes: DashSet<Uuid>,
    criteria_unavailable: AtomicBool,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let store = Self::new();
        for task in tasks {
            store.insert(task);
        }
        store
    }

    pub fn insert(&self, task: Task) {
        self.tasks.insert(task.id, task);
    }

    pub fn get(&self, task_id: &Uuid) -> Option<Task> {
        self.tasks.get(task_id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Snapshot of all records, ordered by creation time then id
    pub fn all_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|entry| entry.value().clone()).collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));
        tasks
    }

    /// Thresholds served by `fetch_delay_criteria`; `None` serves the built-in table
    pub fn set_delay_criteria(&self, criteria: Option<DelayCriteriaTable>) {
        if let Ok(mut guard) = self.criteria.write() {
            *guard = criteria;
        }
    }

    pub fn set_criteria_unavailable(&self, unavailable: bool) {
        self.criteria_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make `soft_delete` fail for this id
    pub fn fail_deletes_for(&self, task_id: Uuid) {
        self.failing_deletes.insert(task_id);
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn fetch_tasks_by_business(
        &self,
        business_names: &[String],
    ) -> TaskWorkflowResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| business_names.contains(&entry.business_name))
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by_key(|task| (task.created_at, task.id));

        debug!(
            requested = business_names.len(),
            fetched = tasks.len(),
            "Fetched tasks by business"
        );
        Ok(tasks)
    }

    async fn fetch_delay_criteria(&self) -> TaskWorkflowResult<DelayCriteriaTable> {
        if self.criteria_unavailable.load(Ordering::SeqCst) {
            return Err(TaskWorkflowError::StoreUnavailable(
                "delay criteria lookup disabled".to_string(),
            ));
        }

        let guard = self
            .criteria
            .read()
            .map_err(|e| TaskWorkflowError::store_error("fetch_delay_criteria", e))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn soft_delete(&self, task_id: Uuid) -> TaskWorkflowResult<SoftDeleteOutcome> {
        if self.failing_deletes.contains(&task_id) {
            return Err(TaskWorkflowError::store_error(
                "soft_delete",
                format!("write rejected for {task_id}"),
            ));
        }

        let mut entry = self
            .tasks
            .get_mut(&task_id)
            .ok_or_else(|| TaskWorkflowError::task_not_found(task_id))?;

        if entry.record_state.mark_deleted() {
            Ok(SoftDeleteOutcome::Deleted)
        } else {
            Ok(SoftDeleteOutcome::AlreadyDeleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::DelayCriteria;
    use crate::models::TaskType;
    use chrono::{TimeZone, Utc};

    fn task(business: &str) -> Task {
        Task::new(
            business,
            TaskType::SelfFunded,
            "self_contract",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_fetch_filters_by_business() {
        let store = InMemoryTaskStore::with_tasks([task("A"), task("B"), task("A")]);
        let fetched = store
            .fetch_tasks_by_business(&["A".to_string()])
            .await
            .unwrap();
        assert_eq!(fetched.len(), 2);
        assert!(fetched.iter().all(|t| t.business_name == "A"));
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() {
        let t = task("A");
        let id = t.id;
        let store = InMemoryTaskStore::with_tasks([t]);

        assert_eq!(store.soft_delete(id).await.unwrap(), SoftDeleteOutcome::Deleted);
        assert_eq!(
            store.soft_delete(id).await.unwrap(),
            SoftDeleteOutcome::AlreadyDeleted
        );
        assert!(store.get(&id).unwrap().record_state.is_deleted());
    }

    #[tokio::test]
    async fn test_soft_delete_errors() {
        let t = task("A");
        let id = t.id;
        let store = InMemoryTaskStore::with_tasks([t]);
        store.fail_deletes_for(id);

        assert!(matches!(
            store.soft_delete(id).await,
            Err(TaskWorkflowError::StoreError { .. })
        ));
        assert!(matches!(
            store.soft_delete(Uuid::new_v4()).await,
            Err(TaskWorkflowError::TaskNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delay_criteria_defaults_and_override() {
        let store = InMemoryTaskStore::new();
        assert_eq!(
            store.fetch_delay_criteria().await.unwrap(),
            DelayCriteriaTable::default()
        );

        let custom =
            DelayCriteriaTable::empty().with_entry(TaskType::Etc, DelayCriteria::new(1, 2));
        store.set_delay_criteria(Some(custom.clone()));
        assert_eq!(store.fetch_delay_criteria().await.unwrap(), custom);

        store.set_criteria_unavailable(true);
        assert!(store.fetch_delay_criteria().await.is_err());
    }
}
