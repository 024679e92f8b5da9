//! # Data Models
//!
//! Task records consumed from the store and the closed set of task types.

pub mod task;
pub mod task_type;

pub use task::{parse_date, DuplicateGroupKey, RecordState, Task, TaskPriority};
pub use task_type::TaskType;
