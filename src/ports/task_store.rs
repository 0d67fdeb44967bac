//! Remote task store port.

use std::future::Future;
use std::pin::Pin;

use crate::cancel::CancelToken;
use crate::error::StoreError;
use crate::model::{
    AiDecision, AiDecisionLog, GenerateSubtasksRequest, Subtask, SubtaskId, Task, TaskDraft,
    TaskId, TaskPatch, TaskState,
};

/// Boxed future type alias used by [`TaskStore`] to keep the trait dyn-compatible.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Typed access to the task service.
///
/// Every call is fire-once: no retries, caching or queueing. Whether the
/// authenticated or the public endpoint family is used is decided by the
/// implementation at the start of each call.
pub trait TaskStore: Send + Sync {
    /// Lists every task visible to the caller, in server order.
    fn list_tasks(&self) -> StoreFuture<'_, Vec<Task>>;

    /// Creates a task; the server assigns `id` and `created_at`.
    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task>;

    /// Replaces the fields present in `patch`.
    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task>;

    /// Moves a task to `state` through the dedicated transition endpoint.
    fn update_state(&self, id: TaskId, state: TaskState) -> StoreFuture<'_, Task>;

    /// Deletes a task.
    fn delete_task(&self, id: TaskId) -> StoreFuture<'_, ()>;

    /// Asks the server for an advisory next state. Does not change the task.
    fn request_ai_decision(&self, id: TaskId) -> StoreFuture<'_, AiDecision>;

    /// Lists past AI suggestions for a task.
    fn list_ai_logs(&self, id: TaskId) -> StoreFuture<'_, Vec<AiDecisionLog>>;

    /// Lists the subtasks of a task.
    ///
    /// Resolves to [`StoreError::Canceled`] once `cancel` fires.
    fn list_subtasks(&self, task_id: TaskId, cancel: &CancelToken) -> StoreFuture<'_, Vec<Subtask>>;

    /// Asks the server to generate subtasks for a task.
    fn generate_subtasks(
        &self,
        task_id: TaskId,
        request: &GenerateSubtasksRequest,
    ) -> StoreFuture<'_, Vec<Subtask>>;

    /// Replaces a subtask.
    fn update_subtask(&self, task_id: TaskId, subtask: &Subtask) -> StoreFuture<'_, Subtask>;

    /// Deletes a subtask.
    fn delete_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> StoreFuture<'_, ()>;
}
