use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{frames::store::FrameStore, utils::clock::Clock};

use super::{
    buckets::WeekBuckets,
    edits::{self, EditOutcome},
    span::WeekSpan,
};

/// The one selected cell of the sheet. Holding a single optional pair is
/// what keeps "at most one selected row across all seven tables" true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub day: usize,
    pub row: usize,
}

/// The weekly sheet: the frame store seen through a Monday-based week
/// window, split into seven day buckets, with a movable week offset and a
/// single selected row. Every navigation and every store mutation rebuilds
/// the buckets and clears the selection.
pub struct WeekSheet<Tz: TimeZone> {
    store: FrameStore,
    clock: Box<dyn Clock>,
    tz: Tz,
    week_offset: u32,
    span: WeekSpan<Tz>,
    buckets: WeekBuckets,
    selection: Option<Selection>,
}

impl<Tz: TimeZone> WeekSheet<Tz> {
    pub fn new(store: FrameStore, tz: Tz, clock: Box<dyn Clock>, week_offset: u32) -> Self {
        let span = WeekSpan::for_offset(clock.time().with_timezone(&tz), week_offset);
        let buckets = WeekBuckets::build(&store, &span);
        Self {
            store,
            clock,
            tz,
            week_offset,
            span,
            buckets,
            selection: None,
        }
    }

    pub fn store(&self) -> &FrameStore {
        &self.store
    }

    pub fn span(&self) -> &WeekSpan<Tz> {
        &self.span
    }

    pub fn buckets(&self) -> &WeekBuckets {
        &self.buckets
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn week_offset(&self) -> u32 {
        self.week_offset
    }

    /// Takes back a selection persisted by a previous invocation. One that
    /// no longer points at an existing row is dropped.
    pub fn restore_selection(&mut self, selection: Option<Selection>) {
        self.selection = match selection {
            Some(selection) if self.buckets.frame_at(selection.day, selection.row).is_some() => {
                Some(selection)
            }
            Some(selection) => {
                debug!("Dropping stale selection {selection:?}");
                None
            }
            None => None,
        };
    }

    pub fn select(&mut self, day: usize, row: usize) -> Result<()> {
        if day >= self.buckets.days().len() {
            bail!("Day {day} is out of range, the sheet has 7 days");
        }
        if self.buckets.frame_at(day, row).is_none() {
            bail!(
                "No row {} on {}",
                row + 1,
                self.buckets.days()[day].date.format("%A %-d %B")
            );
        }
        self.selection = Some(Selection { day, row });
        Ok(())
    }

    pub fn prev(&mut self) {
        self.shift_to(self.week_offset.saturating_add(1));
    }

    /// Refused once the sheet already shows the week containing "now".
    /// Returns whether the sheet moved.
    pub fn next(&mut self) -> bool {
        if self.week_offset == 0 {
            return false;
        }
        self.shift_to(self.week_offset - 1);
        true
    }

    pub fn home(&mut self) {
        self.shift_to(0);
    }

    pub fn edit_start(&mut self, requested: DateTime<Utc>) -> Result<EditOutcome> {
        let index = self.selected_index()?;
        let outcome = edits::resolve_start(&self.store.frames()[index], requested);
        self.store
            .update_start(index, outcome.applied, self.clock.time());
        self.rebuild();
        Ok(outcome)
    }

    pub fn edit_stop(&mut self, requested: DateTime<Utc>) -> Result<EditOutcome> {
        let index = self.selected_index()?;
        let outcome = edits::resolve_stop(
            &self.store.frames()[index],
            self.store.next_start_after(index),
            requested,
        );
        self.store
            .update_stop(index, outcome.applied, self.clock.time());
        self.rebuild();
        Ok(outcome)
    }

    pub fn edit_project(&mut self, project: Arc<str>) -> Result<()> {
        let index = self.selected_index()?;
        self.store.update_project(index, project, self.clock.time());
        self.rebuild();
        Ok(())
    }

    pub fn edit_message(&mut self, message: Option<Arc<str>>) -> Result<()> {
        let index = self.selected_index()?;
        self.store.update_message(index, message, self.clock.time());
        self.rebuild();
        Ok(())
    }

    pub fn delete(&mut self) -> Result<()> {
        let index = self.selected_index()?;
        self.store.remove(index);
        self.rebuild();
        Ok(())
    }

    fn selected_index(&self) -> Result<usize> {
        let Some(selection) = self.selection else {
            bail!("No row is selected. Run `select <day> <row>` first");
        };
        self.buckets
            .frame_at(selection.day, selection.row)
            .context("The selection no longer matches the sheet")
    }

    fn shift_to(&mut self, offset: u32) {
        self.week_offset = offset;
        self.span = WeekSpan::for_offset(self.clock.time().with_timezone(&self.tz), offset);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.buckets = WeekBuckets::build(&self.store, &self.span);
        self.selection = None;
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};

    use super::{Selection, WeekSheet};
    use crate::{
        frames::store::FrameStore,
        overview::{
            fixtures::{pinned_clock, week_of_activity, week_start},
            span::WeekSpan,
        },
    };

    fn current_sheet() -> WeekSheet<Utc> {
        WeekSheet::new(FrameStore::new(week_of_activity()), Utc, pinned_clock(), 0)
    }

    #[test]
    fn test_sheet_shows_the_current_week() {
        let sheet = current_sheet();

        assert_eq!(*sheet.span().start(), week_start());
        assert_eq!(sheet.buckets().week_total(), Duration::hours(84));
        assert_eq!(sheet.selection(), None);
    }

    #[test]
    fn test_selecting_replaces_the_previous_selection() -> Result<()> {
        let mut sheet = current_sheet();

        sheet.select(1, 1)?;
        assert_eq!(sheet.selection(), Some(Selection { day: 1, row: 1 }));

        sheet.select(2, 0)?;
        assert_eq!(sheet.selection(), Some(Selection { day: 2, row: 0 }));
        Ok(())
    }

    #[test]
    fn test_selecting_a_missing_row_fails() {
        let mut sheet = current_sheet();

        assert!(sheet.select(0, 2).is_err());
        assert!(sheet.select(7, 0).is_err());
        assert_eq!(sheet.selection(), None);
    }

    #[test]
    fn test_navigation_clears_the_selection() -> Result<()> {
        let mut sheet = current_sheet();

        sheet.select(1, 1)?;
        sheet.prev();
        assert_eq!(sheet.selection(), None);
        assert_eq!(sheet.week_offset(), 1);
        assert_eq!(*sheet.span().start(), week_start() - Duration::weeks(1));

        sheet.restore_selection(None);
        sheet.home();
        assert_eq!(sheet.week_offset(), 0);
        assert_eq!(*sheet.span().start(), week_start());
        Ok(())
    }

    #[test]
    fn test_next_is_refused_at_the_current_week() {
        let mut sheet = current_sheet();

        assert!(!sheet.next());
        assert_eq!(sheet.week_offset(), 0);

        sheet.prev();
        sheet.prev();
        assert!(sheet.next());
        assert_eq!(sheet.week_offset(), 1);
    }

    #[test]
    fn test_restore_drops_a_stale_selection() {
        let mut sheet = current_sheet();

        sheet.restore_selection(Some(Selection { day: 0, row: 9 }));
        assert_eq!(sheet.selection(), None);

        sheet.restore_selection(Some(Selection { day: 0, row: 1 }));
        assert_eq!(sheet.selection(), Some(Selection { day: 0, row: 1 }));
    }

    #[test]
    fn test_edit_start_mutates_the_store_and_clears_selection() -> Result<()> {
        let mut sheet = current_sheet();
        sheet.select(0, 0)?;

        let outcome = sheet.edit_start(Utc.with_ymd_and_hms(2018, 6, 11, 15, 23, 0).unwrap())?;

        assert!(outcome.clamped);
        assert_eq!(
            sheet.store().frames()[0].start,
            Utc.with_ymd_and_hms(2018, 6, 11, 12, 0, 0).unwrap()
        );
        assert!(sheet.store().is_dirty());
        assert_eq!(sheet.selection(), None);
        Ok(())
    }

    #[test]
    fn test_edit_start_can_move_a_frame_between_buckets() -> Result<()> {
        let mut sheet = current_sheet();
        // Tuesday morning frame back to Monday evening.
        sheet.select(1, 0)?;

        sheet.edit_start(Utc.with_ymd_and_hms(2018, 6, 11, 23, 0, 0).unwrap())?;

        assert_eq!(sheet.buckets().days()[0].rows.len(), 3);
        assert_eq!(sheet.buckets().days()[1].rows.len(), 1);
        Ok(())
    }

    #[test]
    fn test_edit_stop_respects_the_next_frame() -> Result<()> {
        let mut sheet = current_sheet();
        sheet.select(2, 0)?;

        let outcome = sheet.edit_stop(Utc.with_ymd_and_hms(2018, 6, 13, 21, 45, 0).unwrap())?;

        assert!(outcome.clamped);
        assert_eq!(
            sheet.store().frames()[4].stop,
            Utc.with_ymd_and_hms(2018, 6, 13, 18, 0, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_edits_require_a_selection() {
        let mut sheet = current_sheet();

        assert!(sheet
            .edit_start(Utc.with_ymd_and_hms(2018, 6, 11, 7, 0, 0).unwrap())
            .is_err());
        assert!(sheet.edit_project("other".into()).is_err());
        assert!(sheet.delete().is_err());
    }

    #[test]
    fn test_delete_removes_the_selected_frame() -> Result<()> {
        let mut sheet = current_sheet();
        sheet.select(0, 0)?;

        sheet.delete()?;

        assert_eq!(sheet.store().len(), 13);
        assert_eq!(sheet.buckets().days()[0].rows.len(), 1);
        assert!(sheet.store().is_dirty());
        assert_eq!(sheet.selection(), None);
        Ok(())
    }

    #[test]
    fn test_edit_message_and_project() -> Result<()> {
        let mut sheet = current_sheet();

        sheet.select(0, 0)?;
        sheet.edit_project("client".into())?;
        assert_eq!(&*sheet.store().frames()[0].project, "client");

        sheet.select(0, 0)?;
        sheet.edit_message(None)?;
        assert_eq!(sheet.store().frames()[0].message, None);
        Ok(())
    }

    #[test]
    fn test_buckets_follow_the_span() {
        let mut sheet = current_sheet();

        sheet.prev();

        let span = WeekSpan::for_offset(crate::overview::fixtures::test_now(), 1);
        assert_eq!(sheet.span(), &span);
        assert_eq!(sheet.buckets().week_total(), Duration::zero());
    }
}
