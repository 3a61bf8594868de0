use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;

/// Calendar unit a date expression was stated to
///
/// Variants are ordered from coarse to fine, so `Year < Second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DatePrecision {
    /// All precisions, coarsest first
    pub const ALL: [DatePrecision; 6] = [
        DatePrecision::Year,
        DatePrecision::Month,
        DatePrecision::Day,
        DatePrecision::Hour,
        DatePrecision::Minute,
        DatePrecision::Second,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Smallest value the matching calendar field can take
    pub(crate) fn minimum(self) -> i32 {
        match self {
            DatePrecision::Month | DatePrecision::Day => 1,
            _ => 0,
        }
    }

    /// Reads the matching calendar field from a timestamp
    pub(crate) fn field_of(self, dt: &NaiveDateTime) -> i32 {
        match self {
            DatePrecision::Year => dt.year(),
            DatePrecision::Month => dt.month() as i32,
            DatePrecision::Day => dt.day() as i32,
            DatePrecision::Hour => dt.hour() as i32,
            DatePrecision::Minute => dt.minute() as i32,
            DatePrecision::Second => dt.second() as i32,
        }
    }

    /// Rounds a timestamp down to the start of its unit
    pub fn floor(self, dt: NaiveDateTime) -> NaiveDateTime {
        let date = dt.date();
        let start = match self {
            DatePrecision::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1),
            DatePrecision::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1),
            _ => Some(date),
        }
        .unwrap_or(date);

        let time = match self {
            DatePrecision::Year | DatePrecision::Month | DatePrecision::Day => Some(NaiveTime::MIN),
            DatePrecision::Hour => NaiveTime::from_hms_opt(dt.hour(), 0, 0),
            DatePrecision::Minute => NaiveTime::from_hms_opt(dt.hour(), dt.minute(), 0),
            DatePrecision::Second => NaiveTime::from_hms_opt(dt.hour(), dt.minute(), dt.second()),
        }
        .unwrap_or(NaiveTime::MIN);

        start.and_time(time)
    }

    /// Rounds a timestamp up to the last millisecond of its unit
    pub fn ceil(self, dt: NaiveDateTime) -> NaiveDateTime {
        let start = self.floor(dt);
        let next = match self {
            DatePrecision::Year => start.checked_add_months(Months::new(12)),
            DatePrecision::Month => start.checked_add_months(Months::new(1)),
            DatePrecision::Day => start.checked_add_signed(Duration::days(1)),
            DatePrecision::Hour => start.checked_add_signed(Duration::hours(1)),
            DatePrecision::Minute => start.checked_add_signed(Duration::minutes(1)),
            DatePrecision::Second => start.checked_add_signed(Duration::seconds(1)),
        };

        next.and_then(|n| n.checked_sub_signed(Duration::milliseconds(1)))
            .unwrap_or(NaiveDateTime::MAX)
    }
}

impl fmt::Display for DatePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatePrecision::Year => "year",
            DatePrecision::Month => "month",
            DatePrecision::Day => "day",
            DatePrecision::Hour => "hour",
            DatePrecision::Minute => "minute",
            DatePrecision::Second => "second",
        };
        f.write_str(name)
    }
}
