use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use now::DateTimeNow;

use crate::utils::time::local_midnight;

/// One Monday-based calendar week in the sheet's display time zone. The end
/// bound is the following Monday's midnight and is exclusive. Spans are
/// derived from "now" and a whole-week offset, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSpan<Tz: TimeZone> {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl<Tz: TimeZone> WeekSpan<Tz> {
    /// The week `weeks_back` whole weeks before the one containing `now`.
    /// Boundaries are materialized per date, so a DST jump inside the span
    /// shifts a day's length instead of the week's edges.
    pub fn for_offset(now: DateTime<Tz>, weeks_back: u32) -> Self {
        let tz = now.timezone();
        let monday = now.beginning_of_week().date_naive() - Duration::weeks(weeks_back as i64);
        Self {
            start: local_midnight(&tz, monday),
            end: local_midnight(&tz, monday + Duration::weeks(1)),
        }
    }

    pub fn start(&self) -> &DateTime<Tz> {
        &self.start
    }

    pub fn end(&self) -> &DateTime<Tz> {
        &self.end
    }

    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Start-inclusive, end-exclusive.
    pub fn contains(&self, moment: DateTime<Utc>) -> bool {
        self.start <= moment && moment < self.end
    }

    /// The seven calendar dates of the span, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.start.date_naive();
        (0..7).map(move |day| first + Duration::days(day))
    }
}
