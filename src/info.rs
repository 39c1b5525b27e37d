use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::{
    error::{Error, Result},
    schedule::models::{Schedule, TimeRange, Weekday},
};

/// Timezone of the training place
pub const TIMEZONE_NAME: &str = "Asia/Shanghai";

/// Offset of the timezone, there is no daylight saving time
pub const TIMEZONE_OFFSET: &str = "+0800";
const UTC_OFFSET_HOURS: i64 = 8;

/// Domain used to build unique IDs of events
const UID_DOMAIN: &str = "czq.rth1.xyz";

/// Format used by the iCalendar local datetimes
const DT_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Current date at the training place
pub fn today() -> NaiveDate {
    (Utc::now().naive_utc() + Duration::hours(UTC_OFFSET_HOURS)).date()
}

/// ISO week number of the date
pub fn current_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Next time the day comes, today included
pub fn next_occurrence(from: NaiveDate, day: Weekday) -> NaiveDate {
    let days_ahead = (7 + day.ordinal() - from.weekday().num_days_from_monday()) % 7;
    from + Duration::days(i64::from(days_ahead))
}

/// First training of a weekday, in local time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub day: Weekday,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    /// Place the range on the next date of the day, ending the day after if needed
    pub fn new(day: Weekday, range: TimeRange, today: NaiveDate) -> Self {
        let date = next_occurrence(today, day);
        let start = date.and_time(range.start.to_naive());
        let mut end = date.and_time(range.end.to_naive());
        if range.is_overnight() {
            end += Duration::days(1);
        }

        Self { day, start, end }
    }

    /// Stable ID, i.e.: `friday-20240105T190000@czq.rth1.xyz`
    pub fn uid(&self) -> String {
        format!(
            "{}-{}@{UID_DOMAIN}",
            self.day.name().to_lowercase(),
            self.start.format(DT_FORMAT)
        )
    }

    pub fn summary(&self) -> String {
        format!("{} Training", self.day.label())
    }

    pub fn dtstart(&self) -> String {
        self.start.format(DT_FORMAT).to_string()
    }

    pub fn dtend(&self) -> String {
        self.end.format(DT_FORMAT).to_string()
    }
}

/// Build the first occurrence of every weekday, all of them must be known
pub fn occurrences(schedule: &Schedule, today: NaiveDate) -> Result<Vec<Occurrence>> {
    if !schedule.is_complete() {
        return Err(Error::IncompleteSchedule {
            found: schedule.len(),
        });
    }

    Ok(schedule
        .iter()
        .map(|(day, range)| Occurrence::new(day, range, today))
        .collect())
}
