//! # Task Classification
//!
//! Pure, synchronous classifiers over the step registry:
//!
//! - [`progress`] - lifecycle position as a 0-100 percentage
//! - [`display`] - label and color token resolution with cross-type fallback
//! - [`delay`] - schedule health from elapsed days and per-type thresholds
//!
//! None of these perform I/O or fail; unrecognized input yields a safe default.

pub mod delay;
pub mod display;
pub mod progress;

pub use delay::{
    classify, classify_at, classify_task_at, DelayAssessment, DelayCriteria, DelayCriteriaTable,
    ScheduleHealth,
};
pub use display::{color_token, humanize_status, label};
pub use progress::{percent_for_position, progress_percent};
