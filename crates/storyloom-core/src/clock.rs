//! Time source shared by handlers, the catalog cache and generation tasks.

use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current instant. Injected so that tests can pin or step
/// time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Time elapsed since `instant`; negative if `instant` lies ahead.
    fn age_of(&self, instant: DateTime<Utc>) -> TimeDelta {
        self.now() - instant
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
