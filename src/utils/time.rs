use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// This is the standard way of printing a duration in framesheet.
pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!(
            "{}h{}m{}s",
            v.num_hours(),
            v.num_minutes() % 60,
            v.num_seconds() % 60
        )
    } else if v.num_minutes() > 0 {
        format!("{}m{}s", v.num_minutes() % 60, v.num_seconds() % 60)
    } else {
        format!("{}s", v.num_seconds() % 60)
    }
}

/// Materializes midnight of `date` in the given time zone. Zones that skip
/// midnight during a DST jump get the first wall-clock hour that exists.
pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let mut time = NaiveTime::MIN;
    for _ in 0..24 {
        match tz.from_local_datetime(&date.and_time(time)) {
            LocalResult::Single(v) => return v,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => time += Duration::hours(1),
        }
    }
    unreachable!("a day should contain at least one valid instant")
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Timelike, Utc};

    use super::{format_duration, local_midnight};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(30)), "30s");
        assert_eq!(format_duration(Duration::seconds(90)), "1m30s");
        assert_eq!(format_duration(Duration::hours(6)), "6h0m0s");
        assert_eq!(
            format_duration(Duration::hours(25) + Duration::minutes(7)),
            "25h7m0s"
        );
        assert_eq!(format_duration(Duration::zero()), "0s");
    }

    #[test]
    fn test_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2018, 6, 11).unwrap();
        let midnight = local_midnight(&Utc, date);
        assert_eq!(midnight.date_naive(), date);
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.minute(), 0);
    }
}
