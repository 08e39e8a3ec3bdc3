use chrono::{DateTime, Utc};

/// Wall-clock source. Injected so the class-year window and resume timestamps
/// can be pinned in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
