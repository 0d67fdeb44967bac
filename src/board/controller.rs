//! Owner of the task collection and everything the task list shows.
//!
//! [`TaskListController`] holds the last fetched tasks plus the UI-facing
//! state around them (filter, sort, inline edit, detail modal, pending AI
//! suggestion, loading and error). Every mutation goes through the
//! [`TaskStore`] first and only touches local state once the store has
//! answered. Failures leave prior state as it was, push an error
//! [`Notice`], and are returned to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::board::click::{Activation, ClickKind};
use crate::board::view::{self, Filter, Progress, SortOption};
use crate::error::{BoardError, StoreError};
use crate::model::{AiDecision, AiDecisionLog, EditData, Task, TaskDraft, TaskId, TaskPatch, TaskState};
use crate::ports::TaskStore;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// The operation succeeded.
    Success,
    /// The operation failed.
    Error,
}

/// A short, user-facing message produced by a controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Message text.
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

/// The row currently in inline edit mode and its draft values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Task being edited.
    pub task_id: TaskId,
    /// Draft values, not yet saved.
    pub data: EditData,
}

/// An advisory next state fetched for a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Task the suggestion is for.
    pub task_id: TaskId,
    /// What the service proposed.
    pub decision: AiDecision,
}

/// Read-only view of the controller's loading flag.
///
/// Clones share the flag, so a presentation task can watch it while a
/// refresh holds the controller.
#[derive(Debug, Clone)]
pub struct LoadingHandle(Arc<AtomicBool>);

impl LoadingHandle {
    /// Returns true while a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raises the loading flag for as long as it lives.
struct LoadingGuard(Arc<AtomicBool>);

impl LoadingGuard {
    fn hold(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Coordinates the task list with the remote store.
pub struct TaskListController {
    store: Arc<dyn TaskStore>,
    tasks: Vec<Task>,
    filter: Filter,
    sort: SortOption,
    editing: Option<EditSession>,
    selected: Option<TaskId>,
    suggestion: Option<Suggestion>,
    loading: Arc<AtomicBool>,
    error: Option<String>,
    notices: Vec<Notice>,
}

impl TaskListController {
    /// Creates an empty controller. Call [`TaskListController::refresh`] to
    /// populate it.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            filter: Filter::default(),
            sort: SortOption::default(),
            editing: None,
            selected: None,
            suggestion: None,
            loading: Arc::new(AtomicBool::new(false)),
            error: None,
            notices: Vec::new(),
        }
    }

    /// The store this controller talks to.
    #[must_use]
    pub fn store(&self) -> Arc<dyn TaskStore> {
        Arc::clone(&self.store)
    }

    /// Every loaded task, in server order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a loaded task.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Current filter.
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Changes the filter. Purely local.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Current sort option.
    #[must_use]
    pub fn sort(&self) -> SortOption {
        self.sort
    }

    /// Changes the sort option. Purely local.
    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
    }

    /// Returns true while a refresh is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// A shareable view of the loading flag.
    #[must_use]
    pub fn loading_handle(&self) -> LoadingHandle {
        LoadingHandle(Arc::clone(&self.loading))
    }

    /// Message of the last failed refresh, cleared by a successful one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The row in edit mode, if any.
    #[must_use]
    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// The task shown in the detail modal, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.task(id))
    }

    /// The pending AI suggestion, if any.
    #[must_use]
    pub fn suggestion(&self) -> Option<&Suggestion> {
        self.suggestion.as_ref()
    }

    /// Drains the notices produced since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Filtered and sorted tasks for display.
    #[must_use]
    pub fn visible_tasks(&self) -> Vec<&Task> {
        view::visible_tasks(&self.tasks, self.filter, self.sort)
    }

    /// Completion over every loaded task, ignoring the filter.
    #[must_use]
    pub fn progress(&self) -> Progress {
        view::progress(&self.tasks)
    }

    /// Replaces the collection with a fresh fetch.
    ///
    /// On failure the collection is emptied and [`TaskListController::error`]
    /// holds the message.
    ///
    /// # Errors
    ///
    /// Returns the store failure.
    pub async fn refresh(&mut self) -> Result<(), BoardError> {
        let _loading = LoadingGuard::hold(&self.loading);
        let result = self.store.list_tasks().await;
        match result {
            Ok(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                self.tasks = tasks;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.tasks.clear();
                self.error = Some(err.to_string());
                Err(self.fail("load tasks", err))
            }
        }
    }

    /// Creates a task and appends the stored record.
    ///
    /// # Errors
    ///
    /// [`BoardError::EmptyTitle`] for a blank title (the store is not
    /// called), otherwise the store failure.
    pub async fn add(&mut self, draft: TaskDraft) -> Result<Task, BoardError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(self.fail("add task", BoardError::EmptyTitle));
        }
        let draft = TaskDraft { title: title.to_string(), ..draft };

        let result = self.store.create_task(&draft).await;
        match result {
            Ok(task) => {
                info!(id = task.id, "created task");
                self.notices.push(Notice::success(format!("Added \"{}\"", task.title)));
                self.tasks.push(task.clone());
                Ok(task)
            }
            Err(err) => Err(self.fail("add task", err)),
        }
    }

    /// Deletes a task. Deleting a task that is already gone succeeds.
    ///
    /// Some servers answer a missing id with a 500 rather than a 404, so
    /// for an id no longer held locally any server rejection also counts
    /// as already deleted.
    ///
    /// # Errors
    ///
    /// Returns any store failure other than not-found.
    pub async fn remove(&mut self, id: TaskId) -> Result<(), BoardError> {
        let held = self.tasks.iter().any(|t| t.id == id);
        let result = self.store.delete_task(id).await;
        match result {
            Ok(()) => info!(id, "deleted task"),
            Err(StoreError::NotFound) => debug!(id, "task already deleted"),
            Err(err @ (StoreError::Client { .. } | StoreError::Server { .. })) if !held => {
                debug!(id, error = %err, "task not held locally, treating as already deleted");
            }
            Err(err) => return Err(self.fail("delete task", err)),
        }

        self.tasks.retain(|t| t.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.editing.as_ref().is_some_and(|e| e.task_id == id) {
            self.editing = None;
        }
        if self.suggestion.as_ref().is_some_and(|s| s.task_id == id) {
            self.suggestion = None;
        }
        self.notices.push(Notice::success("Task deleted"));
        Ok(())
    }

    /// Flips a task between done and pending. Any non-done state goes to
    /// done.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] or the store failure.
    pub async fn toggle_complete(&mut self, id: TaskId) -> Result<Task, BoardError> {
        let next = self.require(id)?.state.toggled();
        self.transition(id, next).await
    }

    /// Moves a task to an explicit state.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] or the store failure.
    pub async fn set_state(&mut self, id: TaskId, state: TaskState) -> Result<Task, BoardError> {
        self.require(id)?;
        self.transition(id, state).await
    }

    /// Enters inline edit mode for a task, seeded from its current values.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] if the task is not loaded.
    pub fn start_edit(&mut self, id: TaskId) -> Result<(), BoardError> {
        let data = EditData::from_task(self.require(id)?);
        debug!(id, "editing task");
        self.editing = Some(EditSession { task_id: id, data });
        Ok(())
    }

    /// Replaces the draft of the row being edited.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotEditing`] outside edit mode.
    pub fn set_edit_data(&mut self, data: EditData) -> Result<(), BoardError> {
        match self.editing.as_mut() {
            Some(session) => {
                session.data = data;
                Ok(())
            }
            None => Err(BoardError::NotEditing),
        }
    }

    /// Saves the draft. Edit mode ends only if the store accepts it.
    ///
    /// # Errors
    ///
    /// [`BoardError::NotEditing`], [`BoardError::EmptyTitle`],
    /// [`BoardError::UnknownTask`] or the store failure. In every case the
    /// draft is kept.
    pub async fn save_edit(&mut self) -> Result<Task, BoardError> {
        let Some(session) = self.editing.clone() else {
            return Err(self.fail("save task", BoardError::NotEditing));
        };
        let title = session.data.title.trim();
        if title.is_empty() {
            return Err(self.fail("save task", BoardError::EmptyTitle));
        }
        let data = EditData { title: title.to_string(), ..session.data };
        let merged = data.merge_into(self.require(session.task_id)?);

        let result = self.store.update_task(merged.id, &TaskPatch::replace_with(&merged)).await;
        match result {
            Ok(saved) => {
                info!(id = saved.id, "saved task");
                self.editing = None;
                self.replace(saved.clone());
                self.notices.push(Notice::success("Task updated"));
                Ok(saved)
            }
            Err(err) => Err(self.fail("save task", err)),
        }
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Shows a task in the detail modal.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] if the task is not loaded.
    pub fn open_modal(&mut self, id: TaskId) -> Result<(), BoardError> {
        self.require(id)?;
        self.selected = Some(id);
        Ok(())
    }

    /// Hides the detail modal.
    pub fn close_modal(&mut self) {
        self.selected = None;
    }

    /// Applies a resolved click: single opens the modal, double edits.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] if the task is not loaded.
    pub fn activate(&mut self, activation: Activation) -> Result<(), BoardError> {
        match activation.kind {
            ClickKind::Single => self.open_modal(activation.task_id),
            ClickKind::Double => self.start_edit(activation.task_id),
        }
    }

    /// Asks the service which state a task should move to next. Nothing is
    /// applied until [`TaskListController::accept_suggestion`].
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownTask`] or the store failure.
    pub async fn request_suggestion(&mut self, id: TaskId) -> Result<AiDecision, BoardError> {
        self.require(id)?;
        let result = self.store.request_ai_decision(id).await;
        match result {
            Ok(decision) => {
                info!(id, next = %decision.next_state, "received suggestion");
                self.suggestion = Some(Suggestion { task_id: id, decision: decision.clone() });
                Ok(decision)
            }
            Err(err) => Err(self.fail("get suggestion", err)),
        }
    }

    /// Applies the pending suggestion. It is kept if the store rejects it.
    ///
    /// # Errors
    ///
    /// [`BoardError::NoSuggestion`], [`BoardError::UnknownTask`] or the
    /// store failure.
    pub async fn accept_suggestion(&mut self) -> Result<Task, BoardError> {
        let Some(suggestion) = self.suggestion.clone() else {
            return Err(self.fail("apply suggestion", BoardError::NoSuggestion));
        };
        self.require(suggestion.task_id)?;
        let task = self.transition(suggestion.task_id, suggestion.decision.next_state).await?;
        self.suggestion = None;
        Ok(task)
    }

    /// Discards the pending suggestion.
    pub fn dismiss_suggestion(&mut self) {
        self.suggestion = None;
    }

    /// Fetches the suggestion history of a task.
    ///
    /// # Errors
    ///
    /// Returns the store failure.
    pub async fn ai_logs(&mut self, id: TaskId) -> Result<Vec<AiDecisionLog>, BoardError> {
        let result = self.store.list_ai_logs(id).await;
        result.map_err(|err| self.fail("load suggestion history", err))
    }

    async fn transition(&mut self, id: TaskId, state: TaskState) -> Result<Task, BoardError> {
        let result = self.store.update_state(id, state).await;
        match result {
            Ok(task) => {
                info!(id, state = %task.state, "changed task state");
                self.replace(task.clone());
                self.notices.push(Notice::success(format!("Moved to {}", task.state)));
                Ok(task)
            }
            Err(err) => Err(self.fail("update task state", err)),
        }
    }

    fn require(&mut self, id: TaskId) -> Result<&Task, BoardError> {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => Ok(&self.tasks[index]),
            None => Err(self.fail("find task", BoardError::UnknownTask(id))),
        }
    }

    fn replace(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    fn fail(&mut self, action: &str, err: impl Into<BoardError>) -> BoardError {
        let err = err.into();
        warn!(action, error = %err, "task operation failed");
        self.notices.push(Notice::error(format!("Failed to {action}: {err}")));
        err
    }
}
