//! Due-date urgency used to colour task rows.

use std::fmt;

use chrono::NaiveDate;

use crate::model::Task;
use crate::ports::Clock;

/// How pressing a task's due date is relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Due before today and not done.
    Overdue,
    /// Due today and not done.
    Today,
    /// Due after today and not done.
    Upcoming,
    /// No due date, or already done.
    None,
}

impl Urgency {
    /// Classifies `task` against `today`.
    #[must_use]
    pub fn of(task: &Task, today: NaiveDate) -> Self {
        match task.due_date {
            _ if task.is_completed() => Self::None,
            None => Self::None,
            Some(due) if due < today => Self::Overdue,
            Some(due) if due == today => Self::Today,
            Some(_) => Self::Upcoming,
        }
    }

    /// Classifies `task` against the clock's current date.
    #[must_use]
    pub fn now(task: &Task, clock: &dyn Clock) -> Self {
        Self::of(task, clock.today())
    }

    /// Short label, empty for [`Urgency::None`].
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
            Self::None => "",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Local, TimeZone};

    use super::*;
    use crate::board::fake::task;
    use crate::model::TaskState;

    struct FixedClock(DateTime<Local>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Local> {
            self.0
        }
    }

    fn due(date: &str) -> Task {
        Task { due_date: date.parse().ok(), ..task(1, "t") }
    }

    #[test]
    fn classifies_relative_to_today() {
        let today: NaiveDate = "2024-06-15".parse().unwrap();

        assert_eq!(Urgency::of(&due("2024-06-14"), today), Urgency::Overdue);
        assert_eq!(Urgency::of(&due("2024-06-15"), today), Urgency::Today);
        assert_eq!(Urgency::of(&due("2024-06-16"), today), Urgency::Upcoming);
        assert_eq!(Urgency::of(&task(2, "undated"), today), Urgency::None);
    }

    #[test]
    fn done_tasks_are_never_urgent() {
        let today: NaiveDate = "2024-06-15".parse().unwrap();
        let done = Task { state: TaskState::Done, ..due("2024-01-01") };
        assert_eq!(Urgency::of(&done, today), Urgency::None);
    }

    #[test]
    fn reads_today_from_clock() {
        let clock = FixedClock(Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap());
        assert_eq!(Urgency::now(&due("2024-06-15"), &clock), Urgency::Today);
        assert_eq!(Urgency::now(&due("2024-06-15"), &clock).to_string(), "today");
    }
}
