use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing the current moment across
/// the application. This allows tests to pin "now".
pub trait Clock {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
