//! Subtasks: checklist items scoped to one task.

use serde::{Deserialize, Serialize};

use super::task::TaskId;

/// Server-assigned subtask identifier.
pub type SubtaskId = i64;

/// A child checklist item. `task_id` is a plain back reference; deleting
/// the parent does not cascade on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    /// Server-assigned identity.
    pub id: SubtaskId,
    /// Owning task.
    pub task_id: TaskId,
    /// Display title.
    pub title: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

/// Body of `POST /tasks/{id}/subtasks/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSubtasksRequest {
    /// Title of the parent task.
    pub task_title: String,
    /// Description of the parent task, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_description: Option<String>,
}
