//! The weekly overview: one movable Monday-based week window over the frame
//! store, split into seven day buckets with a single selectable row.
//! [sheet::WeekSheet] is the main artifact of this module; the submodules
//! hold the pieces it is assembled from.

pub mod buckets;
pub mod edits;
pub mod render;
pub mod session;
pub mod sheet;
pub mod span;

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::{frames::entities::Frame, utils::clock::Clock};

    /// The moment the original overview fixtures pin "now" to: the last
    /// minute of the week starting Monday 2018-06-11.
    pub fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 6, 17, 23, 59, 0).unwrap()
    }

    pub fn week_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 6, 11, 0, 0, 0).unwrap()
    }

    /// Two 6-hour activities per day for the whole week of 2018-06-11:
    /// 06:00-12:00 and 18:00-00:00, 14 frames in total.
    pub fn week_of_activity() -> Vec<Frame> {
        let monday = week_start();
        (0..14)
            .map(|n| Frame {
                project: "test_overview".into(),
                start: monday + Duration::hours(6 + 12 * n),
                stop: monday + Duration::hours(12 + 12 * n),
                message: Some(format!("activity #{n}").into()),
                updated_at: test_now(),
                id: format!("frame-{n:02}"),
                tags: vec![],
            })
            .collect()
    }

    pub struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn time(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub fn pinned_clock() -> Box<dyn Clock> {
        Box::new(FixedClock(test_now()))
    }
}
