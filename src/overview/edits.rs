use chrono::{DateTime, Utc};

use crate::frames::entities::Frame;

/// What an edit request resolved to. Out-of-bounds requests are clamped to
/// the violated boundary rather than rejected, so the caller needs to know
/// whether the applied value is the requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    pub applied: DateTime<Utc>,
    pub clamped: bool,
}

/// A start may move anywhere up to the frame's own stop. Equal start and
/// stop is a valid zero-length frame.
pub fn resolve_start(frame: &Frame, requested: DateTime<Utc>) -> EditOutcome {
    let applied = requested.min(frame.stop);
    EditOutcome {
        applied,
        clamped: applied != requested,
    }
}

/// A stop is bounded below by the frame's own start and above by the start
/// of the following frame, when there is one. A disordered store can put the
/// following frame before this one; the neighbor bound is ignored then.
pub fn resolve_stop(
    frame: &Frame,
    next_start: Option<DateTime<Utc>>,
    requested: DateTime<Utc>,
) -> EditOutcome {
    let mut applied = requested.max(frame.start);
    if let Some(bound) = next_start.filter(|bound| *bound >= frame.start) {
        applied = applied.min(bound);
    }
    EditOutcome {
        applied,
        clamped: applied != requested,
    }
}
