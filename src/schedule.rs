use std::sync::LazyLock;

use regex::Regex;

use crate::schedule::models::{Schedule, TableRow, TimeOfDay, TimeRange, Weekday};

pub mod models;
pub mod weeks;

/// Title introducing the schedule of the current week, everything before is ignored
const MARKER: &str = "本周安排";

// h1 => start hour | m1 => start minute
// h2 => end hour   | m2 => end minute
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<h1>[0-9]{1,2}):(?P<m1>[0-9]{2})\s*[-~–]\s*(?P<h2>[0-9]{1,2}):(?P<m2>[0-9]{2})",
    )
    .unwrap()
});

/// Where the scan is in the document
#[derive(Debug, Default, PartialEq, Eq)]
enum State {
    /// Marker not found yet
    #[default]
    Idle,
    /// Looking for weekday bullets
    Scanning,
    /// A bullet without time was found, its rows are being collected
    InsideTable {
        days: Vec<Weekday>,
        rows: Vec<TableRow>,
    },
}

/// Line by line schedule reader
#[derive(Debug)]
pub struct Extractor {
    state: State,
    schedule: Schedule,
    current_week: Option<u32>,
}

impl Extractor {
    /// With a `current_week`, table rows are picked by their week numbers
    pub fn new(current_week: Option<u32>) -> Self {
        Self {
            state: State::Idle,
            schedule: Schedule::default(),
            current_week,
        }
    }

    /// Feed the next line, returns `false` once every weekday is known
    pub fn step(&mut self, line: &str) -> bool {
        let line = normalize(line);

        self.state = match std::mem::take(&mut self.state) {
            State::Idle if line.contains(MARKER) => {
                log::trace!("Schedule section starts");
                State::Scanning
            }
            State::Idle => State::Idle,
            State::Scanning => self.scan(&line),
            State::InsideTable { days, rows } if line.is_empty() => {
                State::InsideTable { days, rows }
            }
            State::InsideTable { days, mut rows } if line.starts_with('|') => {
                if let Some(row) = table_row(&line) {
                    log::trace!("Row for {days:?}: {row:?}");
                    rows.push(row);
                }
                State::InsideTable { days, rows }
            }
            State::InsideTable { days, rows } => {
                self.close_table(&days, &rows);
                self.scan(&line)
            }
        };

        !self.schedule.is_complete()
    }

    /// Close a table left open by the end of the document and give the result
    pub fn finish(mut self) -> Schedule {
        if let State::InsideTable { days, rows } = std::mem::take(&mut self.state) {
            self.close_table(&days, &rows);
        }

        self.schedule
    }

    /// Handle a line outside of any table
    fn scan(&mut self, line: &str) -> State {
        if !line.starts_with('*') {
            return State::Scanning;
        }

        let days = Weekday::find_all(line);
        if days.is_empty() {
            return State::Scanning;
        }

        match time_range(line) {
            Some(range) => {
                for day in days {
                    log::debug!("{} => {range} (inline)", day.name());
                    self.schedule.insert(day, range);
                }
                State::Scanning
            }
            None => State::InsideTable { days, rows: vec![] },
        }
    }

    /// Commit the selected row of a table, an inline range already found is kept
    fn close_table(&mut self, days: &[Weekday], rows: &[TableRow]) {
        let Some(row) = select(rows, self.current_week) else {
            log::debug!(
                "No usable row for {days:?} among {} (week {:?})",
                rows.len(),
                self.current_week
            );
            return;
        };

        if row.weeks.is_empty() {
            log::debug!("Picked a row without any valid week for {days:?}");
        }

        for day in days {
            if self.schedule.insert_if_absent(*day, row.range) {
                log::debug!("{} => {} (table)", day.name(), row.range);
            }
        }
    }
}

/// Find the time of each weekend day in the bulletin
pub fn extract(text: &str, current_week: Option<u32>) -> Schedule {
    let mut extractor = Extractor::new(current_week);
    for line in text.lines() {
        if !extractor.step(line) {
            break;
        }
    }

    extractor.finish()
}

/// Pick the row of a table which applies
///
/// With a week number, the first row covering it. Without, the first row.
pub fn select(rows: &[TableRow], current_week: Option<u32>) -> Option<&TableRow> {
    match current_week {
        Some(week) => rows.iter().find(|row| row.weeks.contains(week)),
        // Rows are only kept when both times were found
        None => rows.first(),
    }
}

/// First valid `hh:mm-hh:mm` of the text
pub fn time_range(text: &str) -> Option<TimeRange> {
    TIME_RANGE.captures_iter(&fold_width(text)).find_map(|captures| {
        let clock = |hour: &str, minute: &str| {
            TimeOfDay::new(captures[hour].parse().ok()?, captures[minute].parse().ok()?)
        };

        Some(TimeRange::new(clock("h1", "m1")?, clock("h2", "m2")?))
    })
}

/// Parse a `| weeks | time |` line
fn table_row(line: &str) -> Option<TableRow> {
    let mut cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }

    let [weeks, time, ..] = cells.as_slice() else {
        return None;
    };

    // Header separator like `|---|---|`
    if is_filler(weeks) && is_filler(time) {
        return None;
    }

    Some(TableRow {
        weeks: weeks::parse(weeks),
        range: time_range(time)?,
    })
}

fn is_filler(cell: &str) -> bool {
    cell.chars()
        .all(|c| matches!(c, '-' | '–' | '—') || c.is_whitespace())
}

/// Trim the line and use ASCII digits and punctuation
fn normalize(line: &str) -> String {
    fold_width(line.trim())
}

/// Replace full-width digits, colons, hyphens and tildes by their ASCII form
pub(crate) fn fold_width(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' | '：' | '－' | '～' => {
                char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c)
            }
            c => c,
        })
        .collect()
}
