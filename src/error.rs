//! Error types for the collaborator-facing layer.
//!
//! The classifiers themselves never fail; these errors come from the task store,
//! configuration loading and input validation.

use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskWorkflowError {
    #[error("Store error: {operation} - {reason}")]
    StoreError { operation: String, reason: String },
    #[error("Task {task_id} not found")]
    TaskNotFound { task_id: Uuid },
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskWorkflowError {
    pub fn store_error<O: Into<String>, R: std::fmt::Display>(operation: O, reason: R) -> Self {
        Self::StoreError {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn task_not_found(task_id: Uuid) -> Self {
        Self::TaskNotFound { task_id }
    }
}

impl From<serde_json::Error> for TaskWorkflowError {
    fn from(error: serde_json::Error) -> Self {
        TaskWorkflowError::ValidationError(format!("JSON serialization error: {error}"))
    }
}

impl From<ConfigurationError> for TaskWorkflowError {
    fn from(error: ConfigurationError) -> Self {
        TaskWorkflowError::ConfigurationError(error.to_string())
    }
}

impl From<tokio::task::JoinError> for TaskWorkflowError {
    fn from(error: tokio::task::JoinError) -> Self {
        TaskWorkflowError::Internal(format!("Background task failed: {error}"))
    }
}

pub type TaskWorkflowResult<T> = std::result::Result<T, TaskWorkflowError>;
