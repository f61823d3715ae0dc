use chrono::{Duration, NaiveDate, TimeZone};

use crate::frames::store::FrameStore;

use super::span::WeekSpan;

/// The frames of one calendar day within a [WeekSpan], as indices into the
/// frame store, chronological by start. A frame that crosses midnight
/// belongs to the day it starts in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub rows: Vec<usize>,
    pub tracked: Duration,
}

/// Seven [DayBucket]s partitioning exactly the frames whose start lies in
/// the span. A read-only projection over the store, rebuilt whenever the
/// span or the store changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBuckets {
    days: Vec<DayBucket>,
}

impl WeekBuckets {
    pub fn build<Tz: TimeZone>(store: &FrameStore, span: &WeekSpan<Tz>) -> Self {
        let tz = span.timezone();
        let mut days: Vec<DayBucket> = span
            .dates()
            .map(|date| DayBucket {
                date,
                rows: vec![],
                tracked: Duration::zero(),
            })
            .collect();

        for (index, frame) in store.frames().iter().enumerate() {
            if !span.contains(frame.start) {
                continue;
            }
            // Day membership is decided in the display time zone.
            let date = frame.start.with_timezone(&tz).date_naive();
            if let Some(bucket) = days.iter_mut().find(|bucket| bucket.date == date) {
                bucket.rows.push(index);
                bucket.tracked = bucket.tracked + frame.duration();
            }
        }

        for bucket in &mut days {
            bucket
                .rows
                .sort_by_key(|&index| (store.frames()[index].start, index));
        }

        Self { days }
    }

    pub fn days(&self) -> &[DayBucket] {
        &self.days
    }

    /// Store index of the frame shown at (day, row), if that cell exists.
    pub fn frame_at(&self, day: usize, row: usize) -> Option<usize> {
        self.days.get(day)?.rows.get(row).copied()
    }

    /// Total tracked time over the whole span.
    pub fn week_total(&self) -> Duration {
        self.days
            .iter()
            .fold(Duration::zero(), |total, bucket| total + bucket.tracked)
    }
}
