//! Monotonic clock used for focus timestamps.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Shareable frame clock.
///
/// Clones share the same underlying time. The clock only moves through [`Clock::advance`], so
/// a host stepping frames decides what "now" is, and replaying the same frames gives the same
/// timestamps.
#[derive(Debug, Clone)]
pub struct Clock {
    time: Rc<Cell<Duration>>,
}

impl Clock {
    /// Creates a clock at the given time.
    pub fn with_time(time: Duration) -> Self {
        Self {
            time: Rc::new(Cell::new(time)),
        }
    }

    /// Current time since the clock started.
    pub fn now(&self) -> Duration {
        self.time.get()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        self.time.set(self.time.get().saturating_add(by));
    }
}

impl PartialEq for Clock {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.time, &other.time)
    }
}
