//! Per-task subtask lists with supersede-on-reload semantics.
//!
//! Each task has at most one live load. Starting a new load for the same
//! task fires the previous load's [`CancelToken`] and bumps the task's
//! generation; whatever the earlier load later produces (data, error or
//! cancellation) is dropped because its generation is no longer current.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{BoardError, StoreError};
use crate::model::{GenerateSubtasksRequest, Subtask, SubtaskId, Task, TaskId};
use crate::ports::TaskStore;

/// Result of a [`SubtaskPanel::load`] that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The list was replaced with this many subtasks.
    Loaded(usize),
    /// A newer load (or a close) took over; nothing was written.
    Superseded,
}

#[derive(Debug, Default)]
struct Slot {
    subtasks: Vec<Subtask>,
    generation: u64,
    in_flight: Option<CancelToken>,
}

/// Subtask lists keyed by parent task.
pub struct SubtaskPanel {
    store: Arc<dyn TaskStore>,
    slots: Mutex<HashMap<TaskId, Slot>>,
}

impl SubtaskPanel {
    /// Creates an empty panel over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store, slots: Mutex::new(HashMap::new()) }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<TaskId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subtasks last loaded for `task_id`.
    #[must_use]
    pub fn subtasks(&self, task_id: TaskId) -> Vec<Subtask> {
        self.slots().get(&task_id).map(|slot| slot.subtasks.clone()).unwrap_or_default()
    }

    /// Returns true while a load for `task_id` is in flight.
    #[must_use]
    pub fn is_loading(&self, task_id: TaskId) -> bool {
        self.slots().get(&task_id).is_some_and(|slot| slot.in_flight.is_some())
    }

    /// Fetches the subtasks of `task_id`, superseding any earlier load for
    /// the same task.
    ///
    /// # Errors
    ///
    /// Returns the store failure of a load that is still current. Failures
    /// and cancellations of superseded loads are reported as
    /// [`LoadOutcome::Superseded`].
    pub async fn load(&self, task_id: TaskId) -> Result<LoadOutcome, BoardError> {
        let (generation, cancel) = {
            let mut slots = self.slots();
            let slot = slots.entry(task_id).or_default();
            if let Some(previous) = slot.in_flight.take() {
                previous.cancel();
            }
            slot.generation += 1;
            let cancel = CancelToken::new();
            slot.in_flight = Some(cancel.clone());
            (slot.generation, cancel)
        };
        debug!(task_id, generation, "loading subtasks");

        let result = self.store.list_subtasks(task_id, &cancel).await;

        let mut slots = self.slots();
        let slot = slots.entry(task_id).or_default();
        if slot.generation != generation {
            debug!(task_id, generation, "discarding superseded subtask load");
            return Ok(LoadOutcome::Superseded);
        }
        slot.in_flight = None;
        match result {
            Ok(subtasks) => {
                let count = subtasks.len();
                slot.subtasks = subtasks;
                Ok(LoadOutcome::Loaded(count))
            }
            Err(err) if err.is_canceled() => Ok(LoadOutcome::Superseded),
            Err(err) => {
                warn!(task_id, error = %err, "failed to load subtasks");
                Err(err.into())
            }
        }
    }

    /// Abandons any in-flight load for `task_id` and forgets its list.
    pub fn close(&self, task_id: TaskId) {
        let mut slots = self.slots();
        if let Some(slot) = slots.get_mut(&task_id) {
            if let Some(cancel) = slot.in_flight.take() {
                cancel.cancel();
            }
            slot.generation += 1;
            slot.subtasks.clear();
        }
    }

    /// Flips the completion flag of a loaded subtask.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownSubtask`] if it is not loaded, or the store
    /// failure.
    pub async fn toggle(&self, task_id: TaskId, subtask_id: SubtaskId) -> Result<Subtask, BoardError> {
        let current = self
            .slots()
            .get(&task_id)
            .and_then(|slot| slot.subtasks.iter().find(|s| s.id == subtask_id).cloned())
            .ok_or(BoardError::UnknownSubtask { task_id, subtask_id })?;
        let updated = Subtask { completed: !current.completed, ..current };

        let saved = self.store.update_subtask(task_id, &updated).await.map_err(|err| {
            warn!(task_id, subtask_id, error = %err, "failed to update subtask");
            err
        })?;

        if let Some(slot) = self.slots().get_mut(&task_id) {
            if let Some(entry) = slot.subtasks.iter_mut().find(|s| s.id == saved.id) {
                *entry = saved.clone();
            }
        }
        Ok(saved)
    }

    /// Deletes a subtask. Deleting one that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns any store failure other than not-found.
    pub async fn remove(&self, task_id: TaskId, subtask_id: SubtaskId) -> Result<(), BoardError> {
        match self.store.delete_subtask(task_id, subtask_id).await {
            Ok(()) | Err(StoreError::NotFound) => {}
            Err(err) => {
                warn!(task_id, subtask_id, error = %err, "failed to delete subtask");
                return Err(err.into());
            }
        }
        if let Some(slot) = self.slots().get_mut(&task_id) {
            slot.subtasks.retain(|s| s.id != subtask_id);
        }
        Ok(())
    }

    /// Asks the service to break `task` into subtasks and appends them.
    ///
    /// # Errors
    ///
    /// Returns the store failure.
    pub async fn generate(&self, task: &Task) -> Result<Vec<Subtask>, BoardError> {
        let request = GenerateSubtasksRequest {
            task_title: task.title.clone(),
            task_description: task.description.clone(),
        };
        let generated = self.store.generate_subtasks(task.id, &request).await.map_err(|err| {
            warn!(task_id = task.id, error = %err, "failed to generate subtasks");
            err
        })?;
        info!(task_id = task.id, count = generated.len(), "generated subtasks");

        self.slots().entry(task.id).or_default().subtasks.extend(generated.iter().cloned());
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fake::{subtask, task, FakeStore};

    fn panel(store: &Arc<FakeStore>) -> SubtaskPanel {
        SubtaskPanel::new(Arc::clone(store) as Arc<dyn TaskStore>)
    }

    fn titles(subtasks: &[Subtask]) -> Vec<&str> {
        subtasks.iter().map(|s| s.title.as_str()).collect()
    }

    #[tokio::test]
    async fn load_replaces_list() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        store.state().subtasks.insert(7, vec![subtask(1, 7, "outline"), subtask(2, 7, "draft")]);
        let panel = panel(&store);

        assert_eq!(panel.load(7).await.unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(titles(&panel.subtasks(7)), vec!["outline", "draft"]);
        assert!(!panel.is_loading(7));
        assert!(panel.subtasks(8).is_empty());
    }

    #[tokio::test]
    async fn superseded_load_never_overwrites_newer_result() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        let reply_a = store.hold_next_subtask_list();
        let reply_b = store.hold_next_subtask_list();
        let panel = panel(&store);

        let first = panel.load(7);
        let second = async {
            while store.calls("list_subtasks") < 1 {
                tokio::task::yield_now().await;
            }
            panel.load(7).await
        };
        let driver = async {
            while store.calls("list_subtasks") < 2 {
                tokio::task::yield_now().await;
            }
            reply_b.send(Ok(vec![subtask(2, 7, "B")])).unwrap();
            // A was canceled, so its receiver may already be gone.
            let _ = reply_a.send(Ok(vec![subtask(1, 7, "A")]));
        };

        let (a, b, ()) = tokio::join!(first, second, driver);

        assert_eq!(a.unwrap(), LoadOutcome::Superseded);
        assert_eq!(b.unwrap(), LoadOutcome::Loaded(1));
        assert_eq!(titles(&panel.subtasks(7)), vec!["B"]);
        assert!(!panel.is_loading(7));
    }

    #[tokio::test]
    async fn superseded_failure_is_not_reported() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        let reply_a = store.hold_next_subtask_list();
        let panel = panel(&store);

        let first = panel.load(7);
        let closer = async {
            while store.calls("list_subtasks") < 1 {
                tokio::task::yield_now().await;
            }
            assert!(panel.is_loading(7));
            panel.close(7);
            let _ = reply_a.send(Err(StoreError::Server { status: 500, message: "late".into() }));
        };

        let (a, ()) = tokio::join!(first, closer);
        assert_eq!(a.unwrap(), LoadOutcome::Superseded);
    }

    #[tokio::test]
    async fn current_failure_is_reported_and_keeps_list() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        store.state().subtasks.insert(7, vec![subtask(1, 7, "outline")]);
        let panel = panel(&store);
        panel.load(7).await.unwrap();

        store.fail_next("list_subtasks", StoreError::Transport("offline".into()));
        let err = panel.load(7).await.unwrap_err();

        assert_eq!(err, BoardError::Store(StoreError::Transport("offline".into())));
        assert_eq!(titles(&panel.subtasks(7)), vec!["outline"]);
        assert!(!panel.is_loading(7));
    }

    #[tokio::test]
    async fn toggle_flips_completion() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        store.state().subtasks.insert(7, vec![subtask(1, 7, "outline")]);
        let panel = panel(&store);
        panel.load(7).await.unwrap();

        assert!(panel.toggle(7, 1).await.unwrap().completed);
        assert!(panel.subtasks(7)[0].completed);
        assert!(!panel.toggle(7, 1).await.unwrap().completed);

        assert_eq!(
            panel.toggle(7, 99).await.unwrap_err(),
            BoardError::UnknownSubtask { task_id: 7, subtask_id: 99 }
        );
    }

    #[tokio::test]
    async fn remove_twice_is_a_noop() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        store.state().subtasks.insert(7, vec![subtask(1, 7, "outline"), subtask(2, 7, "draft")]);
        let panel = panel(&store);
        panel.load(7).await.unwrap();

        panel.remove(7, 1).await.unwrap();
        panel.remove(7, 1).await.unwrap();

        assert_eq!(titles(&panel.subtasks(7)), vec!["draft"]);
    }

    #[tokio::test]
    async fn generate_appends_to_loaded_list() {
        let store = FakeStore::with_tasks(vec![task(7, "write")]);
        store.state().subtasks.insert(7, vec![subtask(1, 7, "outline")]);
        let panel = panel(&store);
        panel.load(7).await.unwrap();

        let generated = panel.generate(&task(7, "write")).await.unwrap();

        assert_eq!(generated.len(), 2);
        assert_eq!(panel.subtasks(7).len(), 3);
        assert_eq!(panel.subtasks(7)[1].title, "write step 1");
    }
}
