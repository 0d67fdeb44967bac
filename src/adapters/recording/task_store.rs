//! Recording adapter for the `TaskStore` and `AuthGateway` ports.

use std::sync::{Arc, Mutex};

use serde_json::json;

use super::{input_json, record_result};
use crate::cancel::CancelToken;
use crate::cassette::recorder::CassetteRecorder;
use crate::model::{
    AiDecision, AiDecisionLog, AuthToken, Credentials, GenerateSubtasksRequest, Subtask,
    SubtaskId, Task, TaskDraft, TaskId, TaskPatch, TaskState,
};
use crate::ports::{AuthGateway, StoreFuture, TaskStore};

/// Placeholder written instead of issued bearer tokens.
pub const REDACTED_TOKEN: &str = "<redacted>";

/// Records every call while delegating to an inner store.
pub struct RecordingTaskStore<S> {
    inner: S,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl<S> RecordingTaskStore<S> {
    /// Wraps `inner`, appending its interactions to `recorder`.
    pub fn new(inner: S, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl<S: TaskStore> TaskStore for RecordingTaskStore<S> {
    fn list_tasks(&self) -> StoreFuture<'_, Vec<Task>> {
        let call = self.inner.list_tasks();
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "list_tasks", json!({}), &result);
            result
        })
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let input = input_json(draft);
        let call = self.inner.create_task(draft);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "create_task", input, &result);
            result
        })
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let input = json!({ "id": id, "patch": input_json(patch) });
        let call = self.inner.update_task(id, patch);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "update_task", input, &result);
            result
        })
    }

    fn update_state(&self, id: TaskId, state: TaskState) -> StoreFuture<'_, Task> {
        let input = json!({ "id": id, "state": state });
        let call = self.inner.update_state(id, state);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "update_state", input, &result);
            result
        })
    }

    fn delete_task(&self, id: TaskId) -> StoreFuture<'_, ()> {
        let call = self.inner.delete_task(id);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "delete_task", json!({ "id": id }), &result);
            result
        })
    }

    fn request_ai_decision(&self, id: TaskId) -> StoreFuture<'_, AiDecision> {
        let call = self.inner.request_ai_decision(id);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "request_ai_decision", json!({ "id": id }), &result);
            result
        })
    }

    fn list_ai_logs(&self, id: TaskId) -> StoreFuture<'_, Vec<AiDecisionLog>> {
        let call = self.inner.list_ai_logs(id);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "list_ai_logs", json!({ "id": id }), &result);
            result
        })
    }

    fn list_subtasks(&self, task_id: TaskId, cancel: &CancelToken) -> StoreFuture<'_, Vec<Subtask>> {
        let call = self.inner.list_subtasks(task_id, cancel);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "list_subtasks", json!({ "task_id": task_id }), &result);
            result
        })
    }

    fn generate_subtasks(
        &self,
        task_id: TaskId,
        request: &GenerateSubtasksRequest,
    ) -> StoreFuture<'_, Vec<Subtask>> {
        let input = json!({ "task_id": task_id, "request": input_json(request) });
        let call = self.inner.generate_subtasks(task_id, request);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "generate_subtasks", input, &result);
            result
        })
    }

    fn update_subtask(&self, task_id: TaskId, subtask: &Subtask) -> StoreFuture<'_, Subtask> {
        let input = json!({ "task_id": task_id, "subtask": input_json(subtask) });
        let call = self.inner.update_subtask(task_id, subtask);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "update_subtask", input, &result);
            result
        })
    }

    fn delete_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> StoreFuture<'_, ()> {
        let input = json!({ "task_id": task_id, "subtask_id": subtask_id });
        let call = self.inner.delete_subtask(task_id, subtask_id);
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, "delete_subtask", input, &result);
            result
        })
    }
}

impl<S: AuthGateway> AuthGateway for RecordingTaskStore<S> {
    fn login(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        let input = json!({ "email": credentials.email });
        let call = self.inner.login(credentials);
        Box::pin(async move {
            let result = call.await;
            let redacted = result.as_ref().map(|_| AuthToken { token: REDACTED_TOKEN.into() });
            record_result(&self.recorder, "login", input, &redacted);
            result
        })
    }

    fn register(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken> {
        let input = json!({ "email": credentials.email });
        let call = self.inner.register(credentials);
        Box::pin(async move {
            let result = call.await;
            let redacted = result.as_ref().map(|_| AuthToken { token: REDACTED_TOKEN.into() });
            record_result(&self.recorder, "register", input, &redacted);
            result
        })
    }
}
