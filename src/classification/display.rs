//! Display label and color token resolution.
//!
//! Both lookups are total and resolve in three tiers:
//!
//! 1. exact match in the task type's own table
//! 2. the flattened index over every table
//! 3. a last-resort fallback (humanized status text, or the neutral color token)

use std::borrow::Cow;

use crate::constants::system::FALLBACK_COLOR_TOKEN;
use crate::models::TaskType;
use crate::registry::StepRegistry;

/// Turn a raw status into readable text: `as_part_order` -> `As Part Order`
pub fn humanize_status(status: &str) -> String {
    let mut humanized = String::with_capacity(status.len());
    let mut at_word_start = true;

    for ch in status.chars() {
        if ch == '_' || ch.is_whitespace() {
            humanized.push(' ');
            at_word_start = true;
        } else if at_word_start {
            humanized.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            humanized.extend(ch.to_lowercase());
        }
    }

    humanized
}

impl StepRegistry {
    pub fn label(&self, task_type: TaskType, status: &str) -> Cow<'static, str> {
        match self.resolve(task_type, status) {
            Some(step) => Cow::Borrowed(step.label),
            None => Cow::Owned(humanize_status(status)),
        }
    }

    pub fn color_token(&self, task_type: TaskType, status: &str) -> &'static str {
        self.resolve(task_type, status)
            .map(|step| step.color_token)
            .unwrap_or(FALLBACK_COLOR_TOKEN)
    }
}

/// [`StepRegistry::label`] against the shared registry
pub fn label(task_type: TaskType, status: &str) -> Cow<'static, str> {
    StepRegistry::global().label(task_type, status)
}

/// [`StepRegistry::color_token`] against the shared registry
pub fn color_token(task_type: TaskType, status: &str) -> &'static str {
    StepRegistry::global().color_token(task_type, status)
}
