use std::fmt::Display;

use ansi_term::{Colour, Style};
use chrono::{Duration, TimeZone};

use crate::utils::time::format_duration;

use super::sheet::{Selection, WeekSheet};

const COLUMNS: [&str; 6] = ["#", "start", "stop", "duration", "project", "message"];

/// Renders the whole sheet as text: a title line, one table per day with a
/// "Weekday day month (total)" header, the selected row marked with `>`,
/// and a week-total footer. Column widths are computed over the whole week
/// so the seven tables line up. Times are shown in the sheet's display time
/// zone.
pub fn render_sheet<Tz>(sheet: &WeekSheet<Tz>, styled: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = sheet.span().timezone();
    let days: Vec<Vec<[String; 6]>> = sheet
        .buckets()
        .days()
        .iter()
        .map(|bucket| {
            bucket
                .rows
                .iter()
                .enumerate()
                .map(|(row, &index)| {
                    let frame = &sheet.store().frames()[index];
                    [
                        (row + 1).to_string(),
                        frame.start.with_timezone(&tz).format("%H:%M").to_string(),
                        frame.stop.with_timezone(&tz).format("%H:%M").to_string(),
                        format_duration(frame.duration()),
                        frame.project.to_string(),
                        frame.message.as_deref().unwrap_or("").to_string(),
                    ]
                })
                .collect()
        })
        .collect();

    let mut widths: [usize; 6] = COLUMNS.map(str::len);
    for row in days.iter().flatten() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&title_line(sheet));
    out.push('\n');

    for (day, (bucket, rows)) in sheet.buckets().days().iter().zip(&days).enumerate() {
        out.push('\n');
        let header = format!(
            "{} ({})",
            bucket.date.format("%A %-d %B"),
            format_duration(bucket.tracked)
        );
        out.push_str(&paint(styled, Style::new().bold(), &header));
        out.push('\n');

        if rows.is_empty() {
            out.push_str(&paint(styled, Style::new().dimmed(), "  (no activity)"));
            out.push('\n');
            continue;
        }

        out.push_str(&paint(
            styled,
            Style::new().dimmed(),
            row_line("  ", &COLUMNS.map(String::from), &widths).trim_end(),
        ));
        out.push('\n');

        for (row, cells) in rows.iter().enumerate() {
            let selected = sheet.selection() == Some(Selection { day, row });
            let marker = if selected { "> " } else { "  " };
            let line = row_line(marker, cells, &widths);
            let line = line.trim_end();
            if selected {
                out.push_str(&paint(styled, Colour::Yellow.bold(), line));
            } else {
                out.push_str(line);
            }
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "Week total: {}",
        format_duration(sheet.buckets().week_total())
    ));
    out.push('\n');
    out
}

fn title_line<Tz: TimeZone>(sheet: &WeekSheet<Tz>) -> String {
    let first = sheet.span().start().date_naive();
    let last = first + Duration::days(6);
    let position = match sheet.week_offset() {
        0 => "current week".to_string(),
        1 => "1 week back".to_string(),
        n => format!("{n} weeks back"),
    };
    format!(
        "Week of {} to {} ({position})",
        first.format("%-d %B %Y"),
        last.format("%-d %B %Y")
    )
}

fn row_line(marker: &str, cells: &[String; 6], widths: &[usize; 6]) -> String {
    let mut line = String::from(marker);
    for (cell, width) in cells.iter().zip(widths.iter().copied()) {
        line.push_str(&format!("{cell:<width$}  "));
    }
    line
}

fn paint(styled: bool, style: Style, text: &str) -> String {
    if styled {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}
