//! Replaying adapter for the `TaskStore` and `AuthGateway` ports.

use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cancel::CancelToken;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::StoreError;
use crate::model::{
    AiDecision, AiDecisionLog, AuthToken, Credentials, GenerateSubtasksRequest, Subtask,
    SubtaskId, Task, TaskDraft, TaskId, TaskPatch, TaskState,
};
use crate::ports::{AuthGateway, StoreFuture, TaskStore};

/// Serves store calls from a cassette instead of the network.
///
/// Arguments are not matched against the recording; each operation simply
/// returns its next recorded result.
pub struct ReplayingTaskStore {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingTaskStore {
    /// Creates a store backed by `cassette`.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        Self { replayer: Mutex::new(CassetteReplayer::new(cassette)) }
    }

    /// Number of recorded interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().unwrap_or_else(PoisonError::into_inner).remaining()
    }

    fn replay<T>(&self, operation: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let interaction = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_interaction(operation)
            .map_err(StoreError::Replay)?;
        serde_json::from_value::<Result<T, StoreError>>(interaction.output).map_err(|e| {
            StoreError::Replay(format!(
                "{operation} (seq {}): unexpected recorded output: {e}",
                interaction.seq
            ))
        })?
    }

    fn serve<T>(&self, operation: &'static str) -> StoreFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let result = self.replay(operation);
        Box::pin(async move { result })
    }
}

impl TaskStore for ReplayingTaskStore {
    fn list_tasks(&self) -> StoreFuture<'_, Vec<Task>> {
        self.serve("list_tasks")
    }

    fn create_task(&self, _draft: &TaskDraft) -> StoreFuture<'_, Task> {
        self.serve("create_task")
    }

    fn update_task(&self, _id: TaskId, _patch: &TaskPatch) -> StoreFuture<'_, Task> {
        self.serve("update_task")
    }

    fn update_state(&self, _id: TaskId, _state: TaskState) -> StoreFuture<'_, Task> {
        self.serve("update_state")
    }

    fn delete_task(&self, _id: TaskId) -> StoreFuture<'_, ()> {
        self.serve("delete_task")
    }

    fn request_ai_decision(&self, _id: TaskId) -> StoreFuture<'_, AiDecision> {
        self.serve("request_ai_decision")
    }

    fn list_ai_logs(&self, _id: TaskId) -> StoreFuture<'_, Vec<AiDecisionLog>> {
        self.serve("list_ai_logs")
    }

    fn list_subtasks(&self, _task_id: TaskId, cancel: &CancelToken) -> StoreFuture<'_, Vec<Subtask>> {
        if cancel.is_cancelled() {
            return Box::pin(async { Err(StoreError::Canceled) });
        }
        self.serve("list_subtasks")
    }

    fn generate_subtasks(
        &self,
        _task_id: TaskId,
        _request: &GenerateSubtasksRequest,
    ) -> StoreFuture<'_, Vec<Subtask>> {
        self.serve("generate_subtasks")
    }

    fn update_subtask(&self, _task_id: TaskId, _subtask: &Subtask) -> StoreFuture<'_, Subtask> {
        self.serve("update_subtask")
    }

    fn delete_subtask(&self, _task_id: TaskId, _subtask_id: SubtaskId) -> StoreFuture<'_, ()> {
        self.serve("delete_subtask")
    }
}

impl AuthGateway for ReplayingTaskStore {
    fn login(&self, _credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        self.serve("login")
    }

    fn register(&self, _credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        self.serve("register")
    }
}
