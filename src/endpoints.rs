//! Paths of the task service, per endpoint family.
//!
//! Task routes live under `/api`; auth routes do not.

use crate::model::{SubtaskId, TaskId};

/// Prefix of every task route.
pub const API_PREFIX: &str = "/api";
/// Login route.
pub const LOGIN: &str = "/auth/login";
/// Registration route.
pub const REGISTER: &str = "/auth/register";

/// Endpoint family: a logged-in user's tasks, or the anonymous shared set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// `/api/tasks/...`, requires a bearer token.
    Authenticated,
    /// `/api/tasks/public/...`.
    Public,
}

impl Namespace {
    fn root(self) -> &'static str {
        match self {
            Self::Authenticated => "/api/tasks",
            Self::Public => "/api/tasks/public",
        }
    }
}

/// Task collection (list, create).
#[must_use]
pub fn tasks(ns: Namespace) -> String {
    ns.root().to_string()
}

/// Single task (update, delete).
#[must_use]
pub fn task(ns: Namespace, id: TaskId) -> String {
    format!("{}/{id}", ns.root())
}

/// State transition of a task.
#[must_use]
pub fn task_state(ns: Namespace, id: TaskId) -> String {
    format!("{}/{id}/state", ns.root())
}

/// AI decision request. Only exposed on the authenticated family.
#[must_use]
pub fn ai_decision(id: TaskId) -> String {
    format!("{API_PREFIX}/tasks/{id}/ai/decision")
}

/// AI decision history.
#[must_use]
pub fn ai_logs(ns: Namespace, id: TaskId) -> String {
    format!("{}/{id}/ai/logs", ns.root())
}

/// Subtasks of a task.
#[must_use]
pub fn subtasks(task_id: TaskId) -> String {
    format!("{API_PREFIX}/tasks/{task_id}/subtasks")
}

/// Subtask generation for a task.
#[must_use]
pub fn generate_subtasks(task_id: TaskId) -> String {
    format!("{API_PREFIX}/tasks/{task_id}/subtasks/generate")
}

/// Single subtask.
#[must_use]
pub fn subtask(task_id: TaskId, subtask_id: SubtaskId) -> String {
    format!("{API_PREFIX}/tasks/{task_id}/subtasks/{subtask_id}")
}
