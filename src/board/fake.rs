//! In-memory `TaskStore` used by the board tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::cancel::CancelToken;
use crate::error::StoreError;
use crate::model::{
    AiDecision, AiDecisionLog, GenerateSubtasksRequest, Priority, Subtask, SubtaskId, Task,
    TaskDraft, TaskId, TaskPatch, TaskState,
};
use crate::ports::{StoreFuture, TaskStore};

type SubtaskReply = oneshot::Receiver<Result<Vec<Subtask>, StoreError>>;
type TaskListReply = oneshot::Receiver<Result<Vec<Task>, StoreError>>;

#[derive(Default)]
pub(crate) struct FakeState {
    pub tasks: Vec<Task>,
    pub subtasks: HashMap<TaskId, Vec<Subtask>>,
    pub decision: Option<AiDecision>,
    pub calls: Vec<&'static str>,
    failures: HashMap<&'static str, StoreError>,
    subtask_replies: VecDeque<SubtaskReply>,
    task_list_replies: VecDeque<TaskListReply>,
    next_id: TaskId,
}

#[derive(Default)]
pub(crate) struct FakeStore {
    state: Mutex<FakeState>,
}

pub(crate) fn task(id: TaskId, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: None,
        state: TaskState::Pending,
        due_date: None,
        priority: Priority::Medium,
        created_at: None,
    }
}

pub(crate) fn subtask(id: SubtaskId, task_id: TaskId, title: &str) -> Subtask {
    Subtask { id, task_id, title: title.to_string(), completed: false }
}

impl FakeStore {
    pub(crate) fn with_tasks(tasks: Vec<Task>) -> Arc<Self> {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Arc::new(Self { state: Mutex::new(FakeState { tasks, next_id, ..FakeState::default() }) })
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next call of `operation` fail with `err`.
    pub(crate) fn fail_next(&self, operation: &'static str, err: StoreError) {
        self.state().failures.insert(operation, err);
    }

    /// Holds the next `list_subtasks` call until the returned sender fires.
    pub(crate) fn hold_next_subtask_list(&self) -> oneshot::Sender<Result<Vec<Subtask>, StoreError>> {
        let (tx, rx) = oneshot::channel();
        self.state().subtask_replies.push_back(rx);
        tx
    }

    /// Holds the next `list_tasks` call until the returned sender fires.
    pub(crate) fn hold_next_task_list(&self) -> oneshot::Sender<Result<Vec<Task>, StoreError>> {
        let (tx, rx) = oneshot::channel();
        self.state().task_list_replies.push_back(rx);
        tx
    }

    pub(crate) fn calls(&self, operation: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == operation).count()
    }

    fn begin(&self, operation: &'static str) -> Result<MutexGuard<'_, FakeState>, StoreError> {
        let mut state = self.state();
        state.calls.push(operation);
        match state.failures.remove(operation) {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    fn find(state: &mut FakeState, id: TaskId) -> Result<&mut Task, StoreError> {
        state.tasks.iter_mut().find(|t| t.id == id).ok_or(StoreError::NotFound)
    }
}

fn ready<T: Send + 'static>(result: Result<T, StoreError>) -> StoreFuture<'static, T> {
    Box::pin(async move { result })
}

impl TaskStore for FakeStore {
    fn list_tasks(&self) -> StoreFuture<'_, Vec<Task>> {
        let started = self
            .begin("list_tasks")
            .map(|mut state| (state.task_list_replies.pop_front(), state.tasks.clone()));
        Box::pin(async move {
            match started? {
                (Some(reply), _) => {
                    reply.await.unwrap_or(Err(StoreError::Transport("reply dropped".into())))
                }
                (None, tasks) => Ok(tasks),
            }
        })
    }

    fn create_task(&self, draft: &TaskDraft) -> StoreFuture<'_, Task> {
        let result = self.begin("create_task").map(|mut state| {
            let created = Task {
                id: state.next_id,
                title: draft.title.clone(),
                description: draft.description.clone(),
                state: draft.state,
                due_date: draft.due_date,
                priority: draft.priority,
                created_at: None,
            };
            state.next_id += 1;
            state.tasks.push(created.clone());
            created
        });
        ready(result)
    }

    fn update_task(&self, id: TaskId, patch: &TaskPatch) -> StoreFuture<'_, Task> {
        let result = self.begin("update_task").and_then(|mut state| {
            let task = Self::find(&mut state, id)?;
            if let Some(title) = &patch.title {
                task.title.clone_from(title);
            }
            if let Some(description) = &patch.description {
                task.description = Some(description.clone());
            }
            if let Some(next) = patch.state {
                task.state = next;
            }
            if let Some(due) = patch.due_date {
                task.due_date = due;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            Ok(task.clone())
        });
        ready(result)
    }

    fn update_state(&self, id: TaskId, next: TaskState) -> StoreFuture<'_, Task> {
        let result = self.begin("update_state").and_then(|mut state| {
            let task = Self::find(&mut state, id)?;
            task.state = next;
            Ok(task.clone())
        });
        ready(result)
    }

    fn delete_task(&self, id: TaskId) -> StoreFuture<'_, ()> {
        let result = self.begin("delete_task").and_then(|mut state| {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            if state.tasks.len() == before {
                Err(StoreError::NotFound)
            } else {
                Ok(())
            }
        });
        ready(result)
    }

    fn request_ai_decision(&self, _id: TaskId) -> StoreFuture<'_, AiDecision> {
        let result = self
            .begin("request_ai_decision")
            .and_then(|state| state.decision.clone().ok_or(StoreError::NotFound));
        ready(result)
    }

    fn list_ai_logs(&self, id: TaskId) -> StoreFuture<'_, Vec<AiDecisionLog>> {
        let result = self.begin("list_ai_logs").map(|state| {
            state
                .decision
                .iter()
                .map(|d| AiDecisionLog {
                    id: 1,
                    task_id: id,
                    suggested_state: d.next_state,
                    reason: d.reason.clone(),
                    created_at: None,
                })
                .collect()
        });
        ready(result)
    }

    fn list_subtasks(&self, task_id: TaskId, cancel: &CancelToken) -> StoreFuture<'_, Vec<Subtask>> {
        let cancel = cancel.clone();
        let started = self.begin("list_subtasks").map(|mut state| {
            let stored = state.subtasks.get(&task_id).cloned().unwrap_or_default();
            (state.subtask_replies.pop_front(), stored)
        });
        Box::pin(async move {
            let (reply, stored) = started?;
            let Some(reply) = reply else {
                return Ok(stored);
            };
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(StoreError::Canceled),
                result = reply => result.unwrap_or(Err(StoreError::Transport("reply dropped".into()))),
            }
        })
    }

    fn generate_subtasks(
        &self,
        task_id: TaskId,
        request: &GenerateSubtasksRequest,
    ) -> StoreFuture<'_, Vec<Subtask>> {
        let result = self.begin("generate_subtasks").map(|mut state| {
            let list = state.subtasks.entry(task_id).or_default();
            let base = SubtaskId::try_from(list.len()).unwrap_or(0) + 100;
            let generated: Vec<Subtask> = (0..2)
                .map(|i| subtask(base + i, task_id, &format!("{} step {}", request.task_title, i + 1)))
                .collect();
            list.extend(generated.iter().cloned());
            generated
        });
        ready(result)
    }

    fn update_subtask(&self, task_id: TaskId, subtask: &Subtask) -> StoreFuture<'_, Subtask> {
        let result = self.begin("update_subtask").and_then(|mut state| {
            let slot = state
                .subtasks
                .get_mut(&task_id)
                .and_then(|list| list.iter_mut().find(|s| s.id == subtask.id))
                .ok_or(StoreError::NotFound)?;
            *slot = subtask.clone();
            Ok(subtask.clone())
        });
        ready(result)
    }

    fn delete_subtask(&self, task_id: TaskId, subtask_id: SubtaskId) -> StoreFuture<'_, ()> {
        let result = self.begin("delete_subtask").and_then(|mut state| {
            let list = state.subtasks.get_mut(&task_id).ok_or(StoreError::NotFound)?;
            let before = list.len();
            list.retain(|s| s.id != subtask_id);
            if list.len() == before {
                Err(StoreError::NotFound)
            } else {
                Ok(())
            }
        });
        ready(result)
    }
}
