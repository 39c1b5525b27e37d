use std::{
    collections::{btree_map, BTreeMap, BTreeSet},
    fmt,
};

/// Days of the weekend handled by the bulletin
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Self; 3] = [Self::Friday, Self::Saturday, Self::Sunday];

    /// Position in the week, starting from monday at 0
    pub fn ordinal(self) -> u32 {
        self.to_chrono().num_days_from_monday()
    }

    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Self::Friday => chrono::Weekday::Fri,
            Self::Saturday => chrono::Weekday::Sat,
            Self::Sunday => chrono::Weekday::Sun,
        }
    }

    /// Label used by the bulletin
    pub fn label(self) -> &'static str {
        match self {
            Self::Friday => "周五",
            Self::Saturday => "周六",
            Self::Sunday => "周日",
        }
    }

    /// English name
    pub fn name(self) -> &'static str {
        match self {
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Every day whose label appears in the line, in week order
    pub fn find_all(line: &str) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|day| line.contains(day.label()))
            .collect()
    }
}

/// Wall-clock time, 24-hour based
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// `None` when the hour or the minute is out of the clock
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour <= 23 && minute <= 59).then_some(Self { hour, minute })
    }

    pub fn to_naive(self) -> chrono::NaiveTime {
        // Bounds are checked at construction
        chrono::NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or_default()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Start and end of a training, the end may be before the start
/// when the session goes past midnight
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// True if the end lands on the next day
    pub fn is_overnight(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Set of ISO week numbers a table row applies to
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeekSpec(BTreeSet<u32>);

impl WeekSpec {
    /// Highest ISO week number
    pub const MAX_WEEK: u32 = 53;

    /// Add a week, ignored if outside of `1..=MAX_WEEK`
    pub fn insert(&mut self, week: u32) {
        if (1..=Self::MAX_WEEK).contains(&week) {
            self.0.insert(week);
        }
    }

    /// Add every week between both bounds, whatever their order
    pub fn insert_range(&mut self, a: u32, b: u32) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        for week in low.max(1)..=high.min(Self::MAX_WEEK) {
            self.0.insert(week);
        }
    }

    pub fn contains(&self, week: u32) -> bool {
        self.0.contains(&week)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<u32> for WeekSpec {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut spec = Self::default();
        iter.into_iter().for_each(|week| spec.insert(week));
        spec
    }
}

/// Candidate row of a weekday table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub weeks: WeekSpec,
    pub range: TimeRange,
}

/// Time range found for each weekday
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schedule(BTreeMap<Weekday, TimeRange>);

impl Schedule {
    pub fn get(&self, day: Weekday) -> Option<&TimeRange> {
        self.0.get(&day)
    }

    /// Store the range, replacing any previous one
    pub fn insert(&mut self, day: Weekday, range: TimeRange) {
        self.0.insert(day, range);
    }

    /// Store the range only if the day has nothing yet, returns whether it was stored
    pub fn insert_if_absent(&mut self, day: Weekday, range: TimeRange) -> bool {
        match self.0.entry(day) {
            btree_map::Entry::Vacant(entry) => {
                entry.insert(range);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every weekday of the weekend has a range
    pub fn is_complete(&self) -> bool {
        self.0.len() == Weekday::ALL.len()
    }

    /// Entries in week order
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, TimeRange)> + '_ {
        self.0.iter().map(|(day, range)| (*day, *range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_lookup() {
        assert_eq!(Weekday::find_all("* 周六 09:00-11:00"), vec![Weekday::Saturday]);
        assert_eq!(
            Weekday::find_all("* 周日、周五"),
            vec![Weekday::Friday, Weekday::Sunday]
        );
        assert!(Weekday::find_all("* 周一").is_empty());
    }

    #[test]
    fn weekday_ordinals() {
        let ordinals: Vec<_> = Weekday::ALL.into_iter().map(Weekday::ordinal).collect();
        assert_eq!(ordinals, vec![4, 5, 6]);
        assert_eq!(Weekday::Saturday.to_chrono(), chrono::Weekday::Sat);
    }

    #[test]
    fn time_of_day_bounds() {
        assert!(TimeOfDay::new(23, 59).is_some());
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(8, 60).is_none());
        assert_eq!(TimeOfDay::new(8, 5).unwrap().to_string(), "08:05");
    }

    #[test]
    fn overnight_range() {
        let late = TimeRange::new(TimeOfDay::new(23, 0).unwrap(), TimeOfDay::new(1, 0).unwrap());
        let day = TimeRange::new(TimeOfDay::new(9, 0).unwrap(), TimeOfDay::new(11, 0).unwrap());
        assert!(late.is_overnight());
        assert!(!day.is_overnight());
    }

    #[test]
    fn week_spec_bounds() {
        let mut spec = WeekSpec::default();
        spec.insert(0);
        spec.insert(54);
        assert!(spec.is_empty());

        spec.insert_range(60, 52);
        assert_eq!(spec, [52, 53].into_iter().collect());
    }

    #[test]
    fn schedule_keeps_first_table_entry() {
        let first = TimeRange::new(TimeOfDay::new(9, 0).unwrap(), TimeOfDay::new(11, 0).unwrap());
        let second = TimeRange::new(TimeOfDay::new(10, 0).unwrap(), TimeOfDay::new(12, 0).unwrap());

        let mut schedule = Schedule::default();
        assert!(schedule.insert_if_absent(Weekday::Friday, first));
        assert!(!schedule.insert_if_absent(Weekday::Friday, second));
        assert_eq!(schedule.get(Weekday::Friday), Some(&first));

        schedule.insert(Weekday::Friday, second);
        assert_eq!(schedule.get(Weekday::Friday), Some(&second));
        assert!(!schedule.is_complete());
    }
}
