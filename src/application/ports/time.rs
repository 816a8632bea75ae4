use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Point in time `window` from now.
    fn after(&self, window: Duration) -> DateTime<Utc> {
        self.now() + window
    }
}
