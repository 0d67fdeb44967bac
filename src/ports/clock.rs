//! Clock port for obtaining the current time.

use chrono::{DateTime, Local, NaiveDate};

/// Provides the current time.
///
/// Due-date urgency depends on "today"; substituting a fixed clock keeps
/// rendering deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local time.
    fn now(&self) -> DateTime<Local>;

    /// Returns today's date in local time.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
