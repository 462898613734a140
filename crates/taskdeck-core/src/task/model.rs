//! Task domain model.
//!
//! Tasks are owned by the remote API; the client only keeps the server's
//! representation and sends drafts and partial updates back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Workflow status of a task as understood by the API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Every status the API accepts, in workflow order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire value (`TODO`, `IN_PROGRESS`, `DONE`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TaskStatus::Done)
    }
}

/// Server-assigned task identifier.
///
/// The API hands out opaque string ids; numeric ids are accepted as well and
/// kept in their decimal form so equality works either way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawTaskId", into = "String")]
pub struct TaskId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Text(String),
    Number(i64),
}

impl From<RawTaskId> for TaskId {
    fn from(raw: RawTaskId) -> Self {
        match raw {
            RawTaskId::Text(text) => TaskId(text),
            RawTaskId::Number(number) => TaskId(number.to_string()),
        }
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A category attached to a task, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// A task as returned by the API.
///
/// Fields the client does not know about are preserved in `extra`, so they
/// survive round trips and can still be sorted on by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Creates a task with only an id and a status set.
    pub fn new(id: impl Into<TaskId>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            categories: Vec::new(),
            created_at: None,
            due_date: None,
            status,
            extra: Map::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets a field the client has no typed accessor for.
    pub fn with_extra(mut self, field: impl Into<String>, value: Value) -> Self {
        self.extra.insert(field.into(), value);
        self
    }
}

/// Body of `GET /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Fields sent to `POST /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update sent to `PATCH /api/tasks/{id}`. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// A patch that only changes the status.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(TaskStatus::from_str("IN_PROGRESS").unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Done.to_string(), "DONE");
        assert_eq!(TaskStatus::Todo.as_ref(), "TODO");
        assert!(TaskStatus::from_str("INVALID").is_err());
        assert!(TaskStatus::from_str("done").is_err());
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("IN_PROGRESS")
        );
    }

    #[test]
    fn test_status_labels() {
        let labels: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["To Do", "In Progress", "Done"]);
    }

    #[test]
    fn test_task_deserializes_api_shape() {
        let task: Task = serde_json::from_value(json!({
            "id": "a1b2c3",
            "title": "Write report",
            "description": null,
            "categories": [{"id": "c1", "name": "Work"}],
            "created_at": "2025-01-01T10:00:00Z",
            "due_date": "2025-01-05T18:30:00+03:00",
            "status": "TODO",
            "priority": 3
        }))
        .unwrap();

        assert_eq!(task.id, TaskId::new("a1b2c3"));
        assert_eq!(task.title.as_deref(), Some("Write report"));
        assert!(task.description.is_none());
        assert_eq!(task.categories[0].name, "Work");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.extra.get("priority"), Some(&json!(3)));
        assert_eq!(
            task.due_date.unwrap().to_rfc3339(),
            "2025-01-05T15:30:00+00:00"
        );
    }

    #[test]
    fn test_numeric_ids_compare_as_text() {
        let task: Task = serde_json::from_value(json!({"id": 7, "status": "DONE"})).unwrap();
        assert_eq!(task.id, TaskId::new("7"));
        assert_eq!(serde_json::to_value(&task.id).unwrap(), json!("7"));
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let body = serde_json::to_value(TaskPatch::status(TaskStatus::Done)).unwrap();
        assert_eq!(body, json!({"status": "DONE"}));
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn test_draft_serialization() {
        let mut draft = TaskDraft::new("Buy milk");
        draft.categories = vec!["Home".to_string()];
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body, json!({"title": "Buy milk", "categories": ["Home"]}));
    }

    #[test]
    fn test_task_list_defaults_to_empty() {
        let list: TaskList = serde_json::from_value(json!({})).unwrap();
        assert!(list.tasks.is_empty());
    }
}
