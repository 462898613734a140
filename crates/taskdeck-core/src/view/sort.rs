//! Derivation of the visible task list.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

use super::model::{SortDirection, SortField, ViewSettings};
use crate::task::Task;

/// A comparable value pulled out of a task for one sort field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Time(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Orders two values of the same kind. Values of different kinds, and
    /// numbers that cannot be ordered, compare equal.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            (FieldValue::Number(a), FieldValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Time(a), FieldValue::Time(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Resolves `field` on `task`. `None` means the value is missing.
pub fn field_value<'a>(task: &'a Task, field: &SortField) -> Option<FieldValue<'a>> {
    match field {
        SortField::Id => Some(FieldValue::Text(task.id.as_str())),
        SortField::Title => task.title.as_deref().map(FieldValue::Text),
        SortField::Description => task.description.as_deref().map(FieldValue::Text),
        SortField::Status => Some(FieldValue::Text(task.status.as_str())),
        SortField::CreatedAt => task.created_at.map(FieldValue::Time),
        SortField::DueDate => task.due_date.map(FieldValue::Time),
        SortField::Custom(name) => match task.extra.get(name)? {
            Value::String(text) => Some(FieldValue::Text(text.as_str())),
            Value::Number(number) => number.as_f64().map(FieldValue::Number),
            Value::Bool(flag) => Some(FieldValue::Bool(*flag)),
            _ => None,
        },
    }
}

/// Compares two tasks by `field`.
///
/// A pair where either value is missing compares equal, whatever the other
/// value is, so such tasks keep their relative position.
pub fn compare_tasks(a: &Task, b: &Task, field: &SortField, direction: SortDirection) -> Ordering {
    let (Some(a_value), Some(b_value)) = (field_value(a, field), field_value(b, field)) else {
        return Ordering::Equal;
    };

    let ordering = a_value.compare(&b_value);
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Produces the visible list for `settings`.
///
/// Completed tasks are dropped unless `show_completed` is set. Without a sort
/// field the filtered list keeps the input order.
pub fn apply_view(tasks: &[Task], settings: &ViewSettings) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| settings.show_completed || !task.status.is_done())
        .cloned()
        .collect();

    if let Some(field) = &settings.sort_field {
        insertion_sort_by(&mut visible, |a, b| {
            compare_tasks(a, b, field, settings.sort_direction)
        });
    }

    visible
}

// The comparator is not a total order once missing values are involved, and
// `slice::sort_by` may panic on such comparators.
fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{TaskId, TaskStatus};
    use chrono::TimeZone;
    use serde_json::json;

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("1", TaskStatus::Todo)
                .with_title("Charlie")
                .with_due_date(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            Task::new("2", TaskStatus::Done)
                .with_title("Alpha")
                .with_due_date(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            Task::new("3", TaskStatus::InProgress)
                .with_title("Bravo")
                .with_due_date(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()),
        ]
    }

    fn settings(show_completed: bool, field: Option<SortField>, dir: SortDirection) -> ViewSettings {
        ViewSettings {
            show_completed,
            sort_field: field,
            sort_direction: dir,
        }
    }

    #[test]
    fn test_no_sort_keeps_order() {
        let tasks = sample();
        let visible = apply_view(&tasks, &ViewSettings::default());
        assert_eq!(visible, tasks);
    }

    #[test]
    fn test_hide_completed() {
        let tasks = sample();
        let visible = apply_view(&tasks, &settings(false, None, SortDirection::Asc));
        assert_eq!(ids(&visible), vec!["1", "3"]);
        assert!(visible.iter().all(|t| t.status != TaskStatus::Done));
    }

    #[test]
    fn test_show_completed_is_permutation() {
        let tasks = sample();
        let visible = apply_view(
            &tasks,
            &settings(true, Some(SortField::Title), SortDirection::Asc),
        );
        let mut got = ids(&visible);
        got.sort();
        assert_eq!(got, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_sort_by_title_both_directions() {
        let tasks = sample();
        let asc = apply_view(&tasks, &settings(true, Some(SortField::Title), SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["2", "3", "1"]);

        let desc = apply_view(&tasks, &settings(true, Some(SortField::Title), SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["1", "3", "2"]);
    }

    #[test]
    fn test_sort_by_due_date_after_filter() {
        let tasks = sample();
        let visible = apply_view(
            &tasks,
            &settings(false, Some(SortField::DueDate), SortDirection::Asc),
        );
        assert_eq!(ids(&visible), vec!["3", "1"]);
    }

    #[test]
    fn test_sorting_is_idempotent() {
        let tasks = sample();
        let view = settings(true, Some(SortField::DueDate), SortDirection::Desc);
        let once = apply_view(&tasks, &view);
        let twice = apply_view(&once, &view);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_value_compares_equal() {
        let tasks = vec![
            Task::new("1", TaskStatus::Todo),
            Task::new("2", TaskStatus::Todo).with_extra("x", json!(5)),
        ];
        let field = Some(SortField::Custom("x".to_string()));

        let asc = apply_view(&tasks, &settings(true, field.clone(), SortDirection::Asc));
        assert_eq!(ids(&asc), vec!["1", "2"]);

        let desc = apply_view(&tasks, &settings(true, field, SortDirection::Desc));
        assert_eq!(ids(&desc), vec!["1", "2"]);
    }

    #[test]
    fn test_null_extra_counts_as_missing() {
        let task = Task::new("1", TaskStatus::Todo).with_extra("x", Value::Null);
        assert!(field_value(&task, &SortField::Custom("x".into())).is_none());
    }

    #[test]
    fn test_custom_numeric_field() {
        let tasks = vec![
            Task::new("a", TaskStatus::Todo).with_extra("priority", json!(3)),
            Task::new("b", TaskStatus::Todo).with_extra("priority", json!(1)),
            Task::new("c", TaskStatus::Todo).with_extra("priority", json!(2.5)),
        ];
        let visible = apply_view(
            &tasks,
            &settings(true, Some(SortField::Custom("priority".into())), SortDirection::Asc),
        );
        assert_eq!(ids(&visible), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_unknown_field_keeps_order() {
        let tasks = sample();
        let visible = apply_view(
            &tasks,
            &settings(true, Some(SortField::Custom("date".into())), SortDirection::Desc),
        );
        assert_eq!(visible, tasks);
    }

    #[test]
    fn test_sort_by_status_uses_wire_strings() {
        let tasks = sample();
        let visible = apply_view(
            &tasks,
            &settings(true, Some(SortField::Status), SortDirection::Asc),
        );
        // "DONE" < "IN_PROGRESS" < "TODO"
        assert_eq!(ids(&visible), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_mixed_kinds_compare_equal() {
        let a = Task::new("a", TaskStatus::Todo).with_extra("x", json!("text"));
        let b = Task::new("b", TaskStatus::Todo).with_extra("x", json!(1));
        let field = SortField::Custom("x".into());
        assert_eq!(compare_tasks(&a, &b, &field, SortDirection::Asc), Ordering::Equal);
    }

    #[test]
    fn test_ids_sort_as_text() {
        let tasks = vec![
            Task::new(TaskId::new("b"), TaskStatus::Todo),
            Task::new(TaskId::new("a"), TaskStatus::Todo),
        ];
        let visible = apply_view(&tasks, &settings(true, Some(SortField::Id), SortDirection::Asc));
        assert_eq!(ids(&visible), vec!["a", "b"]);
    }
}
