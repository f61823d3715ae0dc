use std::fmt::Display;

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use chrono_english::parse_date_string;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

/// Maps a weekday name to its column in the sheet, Monday first.
pub fn parse_weekday(input: &str) -> Result<usize> {
    let day = match input.to_ascii_lowercase().as_str() {
        "mon" | "monday" => 0,
        "tue" | "tuesday" => 1,
        "wed" | "wednesday" => 2,
        "thu" | "thursday" => 3,
        "fri" | "friday" => 4,
        "sat" | "saturday" => 5,
        "sun" | "sunday" => 6,
        _ => bail!("'{input}' is not a weekday. Expected e.g. \"mon\" or \"monday\""),
    };
    Ok(day)
}

/// Datetimes for edits: the unambiguous `%Y-%m-%d %H:%M[:%S]` form first,
/// then chrono-english phrases like "yesterday 18:00" relative to `now`,
/// read with the given dialect.
pub fn parse_datetime(input: &str, now: DateTime<Local>, style: DateStyle) -> Result<DateTime<Local>> {
    let strict = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M"));
    if let Ok(naive) = strict {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| anyhow!("'{input}' does not exist in the local time zone"));
    }
    parse_date_string(input, now, style.into())
        .map_err(|e| anyhow!("Couldn't read '{input}' as a date: {e}"))
}
