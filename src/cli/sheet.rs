use std::{fmt::Display, path::Path, sync::Arc};

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use crate::{
    frames::store::FrameStorage,
    overview::{
        render::render_sheet,
        session::{load_session, save_session, Session},
        sheet::WeekSheet,
    },
    utils::clock::Clock,
};

/// One fully parsed sheet operation, ready to run against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetAction {
    Show,
    Prev,
    Next,
    Home,
    Select { day: usize, row: usize },
    EditStart(DateTime<Utc>),
    EditStop(DateTime<Utc>),
    EditProject(Arc<str>),
    EditMessage(Option<Arc<str>>),
    Delete,
}

/// Runs one action through the whole lifecycle: load the frames, restore
/// the session, apply the action, save the frames if anything changed, save
/// the session, render. Returns the text to print, with any notices (a
/// clamped edit, a refused `next`) appended after the sheet.
pub fn process_sheet_action<Tz>(
    storage: &impl FrameStorage,
    state_dir: &Path,
    clock: Box<dyn Clock>,
    tz: Tz,
    styled: bool,
    action: SheetAction,
) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let store = storage.load()?;
    let session = load_session(state_dir);
    let mut sheet = WeekSheet::new(store, tz.clone(), clock, session.week_offset);
    sheet.restore_selection(session.selection);

    let mut notices = Vec::new();
    match action {
        SheetAction::Show => {}
        SheetAction::Prev => sheet.prev(),
        SheetAction::Next => {
            if !sheet.next() {
                notices.push("Already showing the current week.".to_string());
            }
        }
        SheetAction::Home => sheet.home(),
        SheetAction::Select { day, row } => sheet.select(day, row)?,
        SheetAction::EditStart(requested) => {
            let outcome = sheet.edit_start(requested)?;
            if outcome.clamped {
                notices.push(format!(
                    "Start was clamped to {} so the frame doesn't stop before it starts.",
                    stamp(outcome.applied, &tz)
                ));
            }
        }
        SheetAction::EditStop(requested) => {
            let outcome = sheet.edit_stop(requested)?;
            if outcome.clamped {
                notices.push(format!(
                    "Stop was clamped to {} to fit between the frame's start and the next frame.",
                    stamp(outcome.applied, &tz)
                ));
            }
        }
        SheetAction::EditProject(project) => sheet.edit_project(project)?,
        SheetAction::EditMessage(message) => sheet.edit_message(message)?,
        SheetAction::Delete => sheet.delete()?,
    }

    if sheet.store().is_dirty() {
        storage.save(sheet.store())?;
    }
    save_session(
        state_dir,
        &Session {
            week_offset: sheet.week_offset(),
            selection: sheet.selection(),
        },
    )?;

    let mut output = render_sheet(&sheet, styled);
    for notice in notices {
        output.push('\n');
        output.push_str(&notice);
    }
    Ok(output)
}

fn stamp<Tz>(moment: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    moment.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}
