#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Task Workflow Core
//!
//! Classification engine for installation and service tasks.
//!
//! ## Overview
//!
//! Every task belongs to a [`TaskType`] and sits at a status within that type's
//! ordered lifecycle. From a task's type, status and dates the engine derives:
//!
//! - where the task is in its lifecycle, as a 0-100 progress percentage
//! - a display label and color token, even for statuses no table knows
//! - schedule health (on-time, at-risk or delayed) against per-type day thresholds
//! - which records duplicate each other, which one survives and which may be deleted
//!
//! The classifiers are pure synchronous functions over an immutable, process-wide
//! [`StepRegistry`]. Persistence stays with the caller behind the async
//! [`services::TaskStore`] trait.
//!
//! ## Module Organization
//!
//! - [`registry`] - Per-type step tables and the lookup index
//! - [`classification`] - Progress, label/color and schedule health
//! - [`deduplication`] - Duplicate grouping and deletion planning
//! - [`services`] - Store trait, business summaries and batch cleanup
//! - [`models`] - Task records and task types
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use task_workflow::{classification, TaskType};
//!
//! assert_eq!(classification::progress_percent(TaskType::SelfFunded, "self_installation"), 83);
//! assert_eq!(classification::label(TaskType::Etc, "self_quotation"), "견적서 작성");
//! assert_eq!(classification::color_token(TaskType::Dealer, "no_such_status"), "gray");
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib                       # Unit tests
//! cargo test                             # All tests
//! cargo bench --features benchmarks      # Criterion benchmarks
//! ```

pub mod classification;
pub mod config;
pub mod constants;
pub mod deduplication;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod services;

pub use classification::{
    classify, classify_at, color_token, label, progress_percent, DelayAssessment, DelayCriteria,
    DelayCriteriaTable, ScheduleHealth,
};
pub use config::{ConfigLoader, ConfigurationError, EngineConfig};
pub use constants::{status_groups, system};
pub use deduplication::{find_groups, select_default_deletions, DeletionPlan, DuplicateGroup};
pub use error::{TaskWorkflowError, TaskWorkflowResult};
pub use models::{DuplicateGroupKey, RecordState, Task, TaskPriority, TaskType};
pub use registry::{steps_for, StepDefinition, StepRegistry, StepTable};
pub use services::{
    BatchDeletionReport, BusinessStatusSummary, BusinessSummaryService, DuplicateCleanupService,
    InMemoryTaskStore, TaskStore,
};
