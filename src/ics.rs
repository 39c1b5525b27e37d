use std::path::Path;

use chrono::Utc;
use ics::{
    components::Property,
    parameters::TzIDParam,
    properties::{CalScale, Description, DtEnd, DtStart, RRule, Summary, TzName},
    Event, ICalendar, Standard, TimeZone,
};

use crate::{
    error::Result,
    info::{Occurrence, TIMEZONE_NAME, TIMEZONE_OFFSET},
};

/// Calendar metadata
pub struct Options {
    /// Name displayed by calendar apps
    pub name: String,
    /// Page the schedule comes from
    pub source_url: String,
}

/// Build the calendar with one weekly event per weekday
pub fn calendar(occurrences: &[Occurrence], options: &Options) -> ICalendar<'static> {
    let mut calendar = ICalendar::new("2.0", "-//weekend-ics//CZQ Weekend//EN");
    calendar.push(Property::new("NAME", options.name.clone()));
    calendar.push(Property::new("X-WR-CALNAME", options.name.clone()));
    calendar.push(CalScale::new("GREGORIAN"));
    calendar.push(Property::new("X-WR-TIMEZONE", TIMEZONE_NAME));

    // Fixed offset all year long
    let mut standard = Standard::new("19700101T000000", TIMEZONE_OFFSET, TIMEZONE_OFFSET);
    standard.push(TzName::new("CST"));
    let mut timezone = TimeZone::standard(TIMEZONE_NAME, standard);
    timezone.push(Property::new("X-LIC-LOCATION", TIMEZONE_NAME));
    calendar.add_timezone(timezone);

    let dtstamp = dt_ical(Utc::now());
    for occurrence in occurrences {
        let mut event = Event::new(occurrence.uid(), dtstamp.clone());
        event.push(Summary::new(occurrence.summary()));

        let mut date_start = DtStart::new(occurrence.dtstart());
        date_start.add(TzIDParam::new(TIMEZONE_NAME));
        event.push(date_start);

        let mut date_end = DtEnd::new(occurrence.dtend());
        date_end.add(TzIDParam::new(TIMEZONE_NAME));
        event.push(date_end);

        event.push(RRule::new("FREQ=WEEKLY"));
        event.push(Description::new(format!("Source {}", options.source_url)));

        calendar.add_event(event);
    }

    calendar
}

/// Write the calendar to the disk
pub fn export(calendar: ICalendar<'_>, filename: &Path) -> Result<()> {
    calendar.save_file(filename)?;

    Ok(())
}

/// UTC datetime in the iCalendar format
fn dt_ical(dt: chrono::DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::models::{TimeOfDay, TimeRange, Weekday};

    fn occurrence(day: Weekday, start: (u32, u32), end: (u32, u32)) -> Occurrence {
        let range = TimeRange::new(
            TimeOfDay::new(start.0, start.1).unwrap(),
            TimeOfDay::new(end.0, end.1).unwrap(),
        );
        Occurrence::new(day, range, chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn options() -> Options {
        Options {
            name: "CZQ Weekend Training".to_owned(),
            source_url: "https://czq.rth1.xyz/time".to_owned(),
        }
    }

    #[test]
    fn events_are_weekly_and_local() {
        let occurrences = [
            occurrence(Weekday::Friday, (19, 0), (21, 0)),
            occurrence(Weekday::Saturday, (23, 0), (1, 0)),
        ];
        let text = calendar(&occurrences, &options()).to_string();

        assert!(text.starts_with("BEGIN:VCALENDAR"));
        assert!(text.contains("X-WR-CALNAME:CZQ Weekend Training"));
        assert!(text.contains("TZID:Asia/Shanghai"));
        assert!(text.contains("TZOFFSETTO:+0800"));
        assert!(text.contains("UID:friday-20240105T190000@czq.rth1.xyz"));
        assert!(text.contains("DTSTART;TZID=Asia/Shanghai:20240105T190000"));
        assert!(text.contains("DTEND;TZID=Asia/Shanghai:20240107T010000"));
        assert!(text.contains("SUMMARY:周六 Training"));
        assert!(text.contains("DESCRIPTION:Source https://czq.rth1.xyz/time"));
        assert_eq!(text.matches("BEGIN:VEVENT").count(), 2);
        assert_eq!(text.matches("RRULE:FREQ=WEEKLY").count(), 2);
        assert_eq!(text.matches("BEGIN:VTIMEZONE").count(), 1);
    }

    #[test]
    fn dtstamp_in_utc() {
        let dt = chrono::DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(dt_ical(dt), "19700101T000000Z");
    }

    #[test]
    fn export_to_file() {
        let path = std::env::temp_dir().join(format!("weekend-ics-{}.ics", std::process::id()));
        let occurrences = [occurrence(Weekday::Sunday, (10, 0), (12, 0))];

        export(calendar(&occurrences, &options()), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(written.contains("UID:sunday-20240107T100000@czq.rth1.xyz"));
    }
}
