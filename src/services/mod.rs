//! # Services
//!
//! Async, collaborator-facing layer over the pure classifiers: the [`TaskStore`]
//! trait, an in-memory store, batch business summaries and duplicate cleanup.

pub mod business_summary;
pub mod duplicate_cleanup;
pub mod memory_store;
pub mod store;

pub use business_summary::{
    representative_task, summarize_business, BusinessStatusSummary, BusinessSummaryService,
};
pub use duplicate_cleanup::{
    BatchDeletionReport, DeletionFailure, DuplicateCleanupService, DuplicateScan,
};
pub use memory_store::InMemoryTaskStore;
pub use store::{fetch_tasks_chunked, resolve_delay_criteria, SoftDeleteOutcome, TaskStore};
