//! # Step Registry
//!
//! Lifecycle step tables per task type and the immutable index built over them.
//!
//! ## Usage
//!
//! ```rust
//! use task_workflow::models::TaskType;
//! use task_workflow::registry::{steps_for, StepRegistry};
//!
//! let table = steps_for(TaskType::SelfFunded);
//! assert_eq!(table.len(), 12);
//!
//! // Cross-type statuses still resolve through the flattened index
//! let step = StepRegistry::global().resolve(TaskType::Dealer, "self_quotation");
//! assert_eq!(step.map(|s| s.label), Some("견적서 작성"));
//! ```

pub mod step_registry;
pub mod step_tables;

pub use step_registry::{steps_for, StepDefinition, StepPosition, StepRegistry, StepTable};
