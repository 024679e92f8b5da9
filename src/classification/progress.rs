use crate::models::TaskType;
use crate::registry::{StepPosition, StepRegistry};

/// Percentage for a known position: `round((index + 1) / total * 100)`, half up
pub fn percent_for_position(position: StepPosition) -> u8 {
    if position.total == 0 {
        return 0;
    }
    let ordinal = position.ordinal().min(position.total);
    // floor(x + 0.5) in integer arithmetic
    ((ordinal * 200 + position.total) / (position.total * 2)) as u8
}

impl StepRegistry {
    /// Progress of `status` through the lifecycle of `task_type`, 0-100.
    ///
    /// A status that is not in the type's own table reports 0: there is no
    /// measurable progress for it. Percentages are not comparable across types
    /// because each table has its own length.
    pub fn progress_percent(&self, task_type: TaskType, status: &str) -> u8 {
        self.position(task_type, status)
            .map(percent_for_position)
            .unwrap_or(0)
    }
}

/// [`StepRegistry::progress_percent`] against the shared registry
pub fn progress_percent(task_type: TaskType, status: &str) -> u8 {
    StepRegistry::global().progress_percent(task_type, status)
}
