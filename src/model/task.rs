//! Task record, lifecycle state, and the request bodies that mutate it.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Lifecycle state of a task.
///
/// This is the single source of truth for completion; the legacy boolean
/// flag is derived from it (see [`Task::is_completed`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Not started yet.
    #[default]
    Pending,
    /// Work in progress.
    Executing,
    /// Finished.
    Done,
}

impl TaskState {
    /// Returns true for [`TaskState::Done`].
    #[must_use]
    pub fn is_done(self) -> bool {
        self == Self::Done
    }

    /// Rank used as the primary sort key: executing, then pending, then done.
    #[must_use]
    pub fn progress_rank(self) -> u8 {
        match self {
            Self::Executing => 0,
            Self::Pending => 1,
            Self::Done => 2,
        }
    }

    /// The state a completion toggle moves to.
    #[must_use]
    pub fn toggled(self) -> Self {
        if self.is_done() {
            Self::Pending
        } else {
            Self::Done
        }
    }

    /// Wire name (`PENDING`, `EXECUTING`, `DONE`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Executing => "EXECUTING",
            Self::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "EXECUTING" => Ok(Self::Executing),
            "DONE" => Ok(Self::Done),
            other => Err(format!("unknown task state {other:?} (expected pending, executing or done)")),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Severity rank for sorting: high first.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority {other:?} (expected low, medium or high)")),
        }
    }
}

/// A to-do item as held by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskWire", into = "TaskWire")]
pub struct Task {
    /// Server-assigned identity.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Lifecycle state.
    pub state: TaskState,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Priority.
    pub priority: Priority,
    /// Server-assigned creation time.
    pub created_at: Option<NaiveDateTime>,
}

impl Task {
    /// Legacy completion flag, derived from [`Task::state`].
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state.is_done()
    }
}

/// JSON shape of a task. Older servers only send `completed`; newer ones
/// send `state`. Both are written so either kind of server understands us.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskWire {
    id: TaskId,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    state: Option<TaskState>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    /// Older rows store `null` for an unset priority.
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<NaiveDateTime>,
}

impl From<TaskWire> for Task {
    fn from(wire: TaskWire) -> Self {
        let state = wire.state.unwrap_or(if wire.completed == Some(true) {
            TaskState::Done
        } else {
            TaskState::Pending
        });
        Self {
            id: wire.id,
            title: wire.title,
            description: wire.description,
            state,
            due_date: wire.due_date,
            priority: wire.priority.unwrap_or_default(),
            created_at: wire.created_at,
        }
    }
}

impl From<Task> for TaskWire {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: Some(task.state.is_done()),
            state: Some(task.state),
            due_date: task.due_date,
            priority: Some(task.priority),
            created_at: task.created_at,
        }
    }
}

/// Body of a create request. The server assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title; must not be blank.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial state.
    pub state: TaskState,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Priority.
    pub priority: Priority,
}

impl TaskDraft {
    /// A pending, medium-priority draft with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            state: TaskState::Pending,
            due_date: None,
            priority: Priority::Medium,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftWire<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    completed: bool,
    state: TaskState,
    due_date: Option<NaiveDate>,
    priority: Priority,
}

impl Serialize for TaskDraft {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DraftWire {
            title: &self.title,
            description: self.description.as_deref(),
            completed: self.state.is_done(),
            state: self.state,
            due_date: self.due_date,
            priority: self.priority,
        }
        .serialize(serializer)
    }
}

/// Body of an update request.
///
/// Absent fields are left to the server. `due_date` is tri-state:
/// `None` leaves it, `Some(None)` clears it, `Some(Some(d))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New state.
    pub state: Option<TaskState>,
    /// New due date, or an explicit clear.
    pub due_date: Option<Option<NaiveDate>>,
    /// New priority.
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// A patch that replaces every field with the values of `task`.
    #[must_use]
    pub fn replace_with(task: &Task) -> Self {
        Self {
            title: Some(task.title.clone()),
            description: task.description.clone(),
            state: Some(task.state),
            due_date: Some(task.due_date),
            priority: Some(task.priority),
        }
    }

    /// Returns true when the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatchWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<TaskState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<Priority>,
}

impl Serialize for TaskPatch {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PatchWire {
            title: self.title.as_deref(),
            description: self.description.as_deref(),
            completed: self.state.map(TaskState::is_done),
            state: self.state,
            due_date: self.due_date,
            priority: self.priority,
        }
        .serialize(serializer)
    }
}

/// In-progress edit of a single task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditData {
    /// Draft title.
    pub title: String,
    /// Draft due date.
    pub due_date: Option<NaiveDate>,
    /// Draft priority.
    pub priority: Priority,
}

impl EditData {
    /// Seeds a draft from the current values of `task`.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self { title: task.title.clone(), due_date: task.due_date, priority: task.priority }
    }

    /// Returns `task` with the draft fields merged over it.
    #[must_use]
    pub fn merge_into(&self, task: &Task) -> Task {
        Task {
            title: self.title.clone(),
            due_date: self.due_date,
            priority: self.priority,
            ..task.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_legacy_completed_flag() {
        let task: Task = serde_json::from_value(json!({
            "id": 4,
            "title": "write report",
            "completed": true,
            "dueDate": "2024-03-01",
            "priority": "high"
        }))
        .unwrap();

        assert_eq!(task.state, TaskState::Done);
        assert!(task.is_completed());
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn null_priority_falls_back_to_medium() {
        let task: Task = serde_json::from_value(json!({
            "id": 5,
            "title": "old row",
            "state": "PENDING",
            "priority": null
        }))
        .unwrap();

        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(serde_json::to_value(&task).unwrap()["priority"], "medium");
    }

    #[test]
    fn state_wins_over_completed_flag() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "title": "x",
            "completed": true,
            "state": "EXECUTING",
            "dueDate": null,
            "createdAt": "2024-05-02T09:15:30.123"
        }))
        .unwrap();

        assert_eq!(task.state, TaskState::Executing);
        assert!(!task.is_completed());
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.created_at.is_some());
    }

    #[test]
    fn encodes_state_and_derived_flag() {
        let task = Task {
            id: 9,
            title: "ship".into(),
            description: None,
            state: TaskState::Done,
            due_date: None,
            priority: Priority::Low,
            created_at: None,
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["state"], "DONE");
        assert_eq!(value["completed"], true);
        assert_eq!(value["dueDate"], serde_json::Value::Null);
        assert!(value.get("description").is_none());
    }

    #[test]
    fn patch_omits_untouched_fields_and_can_clear_due_date() {
        let patch = TaskPatch { due_date: Some(None), ..TaskPatch::default() };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "dueDate": null }));

        let patch = TaskPatch { state: Some(TaskState::Done), ..TaskPatch::default() };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({ "state": "DONE", "completed": true }));
    }

    #[test]
    fn edit_data_merges_only_draft_fields() {
        let task = Task {
            id: 2,
            title: "old".into(),
            description: Some("keep me".into()),
            state: TaskState::Executing,
            due_date: None,
            priority: Priority::Low,
            created_at: None,
        };
        let mut edit = EditData::from_task(&task);
        edit.title = "new".into();
        edit.priority = Priority::High;

        let merged = edit.merge_into(&task);
        assert_eq!(merged.title, "new");
        assert_eq!(merged.priority, Priority::High);
        assert_eq!(merged.description.as_deref(), Some("keep me"));
        assert_eq!(merged.state, TaskState::Executing);
    }

    #[test]
    fn toggled_flips_between_done_and_pending() {
        assert_eq!(TaskState::Pending.toggled(), TaskState::Done);
        assert_eq!(TaskState::Executing.toggled(), TaskState::Done);
        assert_eq!(TaskState::Done.toggled(), TaskState::Pending);
    }

    #[test]
    fn parses_state_and_priority_case_insensitively() {
        assert_eq!("executing".parse::<TaskState>().unwrap(), TaskState::Executing);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("later".parse::<TaskState>().is_err());
    }
}
