use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use task_workflow::models::{Task, TaskType};
use task_workflow::StepRegistry;

/// Strategy for generating any task type
pub fn task_type_strategy() -> impl Strategy<Value = TaskType> {
    prop::sample::select(TaskType::ALL.to_vec())
}

/// Strategy for generating a task type together with one of its own statuses
pub fn known_status_strategy() -> impl Strategy<Value = (TaskType, &'static str)> {
    task_type_strategy().prop_flat_map(|task_type| {
        let statuses: Vec<&'static str> = StepRegistry::global()
            .steps_for(task_type)
            .iter()
            .map(|step| step.status)
            .collect();
        (Just(task_type), prop::sample::select(statuses))
    })
}

/// Strategy for generating two step indices `i < j` within one type's table
pub fn ordered_step_pair_strategy() -> impl Strategy<Value = (TaskType, usize, usize)> {
    task_type_strategy().prop_flat_map(|task_type| {
        let len = StepRegistry::global().steps_for(task_type).len();
        (Just(task_type), 0..len, 0..len)
            .prop_filter("distinct indices", |(_, i, j)| i != j)
            .prop_map(|(task_type, i, j)| (task_type, i.min(j), i.max(j)))
    })
}

/// Strategy for generating status strings no step table contains
pub fn unknown_status_strategy() -> impl Strategy<Value = String> {
    "zz_[a-z]{1,12}(_[a-z]{1,8}){0,2}"
}

/// Strategy for generating terminal statuses
pub fn completed_status_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(task_workflow::status_groups::COMPLETED_STATUSES.to_vec())
}

/// Strategy for generating task collections dense in duplicates: few businesses,
/// few statuses, creation times in a narrow window
pub fn duplicate_heavy_tasks_strategy() -> impl Strategy<Value = Vec<Task>> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    prop::collection::vec(
        (
            prop::sample::select(vec!["Acme", "Beta", "Gamma"]),
            prop::sample::select(vec![TaskType::SelfFunded, TaskType::AfterService]),
            prop::sample::select(vec!["self_contract", "as_visit", "unknown"]),
            0i64..48,
            any::<bool>(),
        ),
        0..40,
    )
    .prop_map(move |rows| {
        rows.into_iter()
            .map(|(business, task_type, status, hours, deleted)| {
                let mut task =
                    Task::new(business, task_type, status, base + Duration::hours(hours));
                if deleted {
                    task.record_state.mark_deleted();
                }
                task
            })
            .collect()
    })
}
