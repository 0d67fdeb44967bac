//! Single versus double click disambiguation.
//!
//! A press starts a pending single click. A second press on the same task
//! inside the window resolves a double click and the single never fires.
//! Otherwise the single resolves when its window elapses (via
//! [`ClickDetector::poll`]) or when a press lands on a different task.
//!
//! The detector never reads the clock itself; callers pass `now`, which
//! keeps it deterministic under test.

use std::time::{Duration, Instant};

use crate::model::TaskId;

/// Default window within which a second press counts as a double click.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(250);

/// How a task row was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    /// Opens the detail view.
    Single,
    /// Enters inline edit mode.
    Double,
}

/// A resolved click on a task row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Row that was clicked.
    pub task_id: TaskId,
    /// Single or double.
    pub kind: ClickKind,
}

impl Activation {
    fn single(task_id: TaskId) -> Self {
        Self { task_id, kind: ClickKind::Single }
    }

    fn double(task_id: TaskId) -> Self {
        Self { task_id, kind: ClickKind::Double }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClickState {
    Idle,
    PendingSingle { task_id: TaskId, deadline: Instant },
}

/// Turns raw presses into [`Activation`]s.
#[derive(Debug, Clone)]
pub struct ClickDetector {
    window: Duration,
    state: ClickState,
}

impl Default for ClickDetector {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_WINDOW)
    }
}

impl ClickDetector {
    /// Creates an idle detector with the given double-click window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self { window, state: ClickState::Idle }
    }

    /// Registers a press on `task_id` at `now`.
    ///
    /// Returns a double click if this press completes one, or the single
    /// click of a different task that this press displaced. A press that
    /// only starts a pending single returns `None`.
    pub fn press(&mut self, task_id: TaskId, now: Instant) -> Option<Activation> {
        let pending = ClickState::PendingSingle { task_id, deadline: now + self.window };
        match self.state {
            ClickState::PendingSingle { task_id: previous, deadline }
                if previous == task_id && now <= deadline =>
            {
                self.state = ClickState::Idle;
                Some(Activation::double(task_id))
            }
            ClickState::PendingSingle { task_id: previous, .. } => {
                self.state = pending;
                Some(Activation::single(previous))
            }
            ClickState::Idle => {
                self.state = pending;
                None
            }
        }
    }

    /// Resolves the pending single click if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Activation> {
        match self.state {
            ClickState::PendingSingle { task_id, deadline } if now > deadline => {
                self.state = ClickState::Idle;
                Some(Activation::single(task_id))
            }
            _ => None,
        }
    }

    /// When the pending single click resolves, if one is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            ClickState::PendingSingle { deadline, .. } => Some(deadline),
            ClickState::Idle => None,
        }
    }

    /// Returns true when no click is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == ClickState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn lone_press_resolves_to_single_after_window() {
        let t0 = Instant::now();
        let mut clicks = ClickDetector::default();

        assert_eq!(clicks.press(7, t0), None);
        assert_eq!(clicks.deadline(), Some(t0 + DOUBLE_CLICK_WINDOW));
        assert_eq!(clicks.poll(t0 + ms(100)), None);
        assert_eq!(clicks.poll(t0 + ms(300)), Some(Activation::single(7)));
        assert!(clicks.is_idle());
        assert_eq!(clicks.poll(t0 + ms(600)), None);
    }

    #[test]
    fn second_press_within_window_is_double_only() {
        let t0 = Instant::now();
        let mut clicks = ClickDetector::default();

        clicks.press(7, t0);
        assert_eq!(clicks.press(7, t0 + ms(120)), Some(Activation::double(7)));
        // The single never fires.
        assert_eq!(clicks.poll(t0 + ms(1000)), None);
        assert_eq!(clicks.deadline(), None);
    }

    #[test]
    fn slow_second_press_is_two_singles() {
        let t0 = Instant::now();
        let mut clicks = ClickDetector::default();

        clicks.press(7, t0);
        assert_eq!(clicks.press(7, t0 + ms(400)), Some(Activation::single(7)));
        assert_eq!(clicks.poll(t0 + ms(700)), Some(Activation::single(7)));
    }

    #[test]
    fn press_on_other_task_resolves_previous_single() {
        let t0 = Instant::now();
        let mut clicks = ClickDetector::default();

        clicks.press(1, t0);
        assert_eq!(clicks.press(2, t0 + ms(50)), Some(Activation::single(1)));
        assert_eq!(clicks.press(2, t0 + ms(100)), Some(Activation::double(2)));
        assert!(clicks.is_idle());
    }

    #[test]
    fn custom_window_is_respected() {
        let t0 = Instant::now();
        let mut clicks = ClickDetector::new(ms(50));

        clicks.press(3, t0);
        assert_eq!(clicks.press(3, t0 + ms(80)), Some(Activation::single(3)));
    }
}
