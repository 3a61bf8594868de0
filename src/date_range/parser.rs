//! Free-text date expression parsing
//!
//! Turns a single date expression into [`ParsedComponents`], recording which
//! calendar fields the text stated explicitly. Unrecognized text yields `None`.

use super::DatePrecision;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Calendar fields of one parsed date
///
/// `known` fields were written in the expression; `implied` fields were filled
/// in from context (the other end of a range).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedComponents {
    known: [Option<i32>; 6],
    implied: [Option<i32>; 6],
}

impl ParsedComponents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a field as explicitly stated
    pub fn certain(mut self, field: DatePrecision, value: i32) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: DatePrecision, value: i32) {
        self.known[field.index()] = Some(value);
    }

    pub fn is_certain(&self, field: DatePrecision) -> bool {
        self.known[field.index()].is_some()
    }

    pub fn get_certain(&self, field: DatePrecision) -> Option<i32> {
        self.known[field.index()]
    }

    /// Fills a field from context unless it was stated
    pub fn imply(&mut self, field: DatePrecision, value: i32) {
        if !self.is_certain(field) {
            self.implied[field.index()] = Some(value);
        }
    }

    /// The finest explicitly stated field
    pub fn precision(&self) -> Option<DatePrecision> {
        DatePrecision::ALL
            .iter()
            .rev()
            .copied()
            .find(|field| self.is_certain(*field))
    }

    /// Builds a timestamp from the components
    ///
    /// Missing fields coarser than the precision come from `now`; missing
    /// finer fields take their minimum. Returns `None` when there is no
    /// precision or the fields do not form a valid calendar date.
    pub fn to_datetime(&self, now: &NaiveDateTime) -> Option<NaiveDateTime> {
        let precision = self.precision()?;

        let value = |field: DatePrecision| -> i32 {
            self.known[field.index()]
                .or(self.implied[field.index()])
                .unwrap_or_else(|| {
                    if field < precision {
                        field.field_of(now)
                    } else {
                        field.minimum()
                    }
                })
        };

        let date = NaiveDate::from_ymd_opt(
            value(DatePrecision::Year),
            u32::try_from(value(DatePrecision::Month)).ok()?,
            u32::try_from(value(DatePrecision::Day)).ok()?,
        )?;

        date.and_hms_opt(
            u32::try_from(value(DatePrecision::Hour)).ok()?,
            u32::try_from(value(DatePrecision::Minute)).ok()?,
            u32::try_from(value(DatePrecision::Second)).ok()?,
        )
    }

    /// Copies stated year and month of `other` as implied values
    pub fn inherit_from(&mut self, other: &ParsedComponents) {
        for field in [DatePrecision::Year, DatePrecision::Month] {
            // only when this side is finer than the inherited field
            if let (Some(value), Some(precision)) = (other.get_certain(field), self.precision()) {
                if precision > field {
                    self.imply(field, value);
                }
            }
        }
    }

    fn set_date(&mut self, date: NaiveDate) {
        self.set(DatePrecision::Year, date.year());
        self.set(DatePrecision::Month, date.month() as i32);
        self.set(DatePrecision::Day, date.day() as i32);
    }

    fn set_time(&mut self, time: &[(DatePrecision, i32)]) {
        for (field, value) in time {
            self.set(*field, *value);
        }
    }
}

/// Parses one date expression
pub fn parse_component(input: &str, now: &NaiveDateTime) -> Option<ParsedComponents> {
    let lowered = input.trim().to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split_whitespace()
        .filter(|t| *t != "of" && *t != "the")
        .collect();

    if tokens.is_empty() {
        return None;
    }

    // ISO timestamp such as 2023-03-05t14:30
    if tokens.len() == 1 {
        if let Some((date, time)) = tokens[0].split_once('t') {
            if date.contains('-') && !time.is_empty() {
                tokens = vec![date, time];
            }
        }
    }

    let mut time = None;
    if let Some(pos) = tokens.iter().position(|t| *t == "at") {
        if tokens.len() != pos + 2 {
            return None;
        }
        time = Some(parse_time(tokens[pos + 1])?);
        tokens.truncate(pos);
    } else if let Some(last) = tokens.last().copied() {
        if last.contains(':') || is_meridiem(last) {
            time = Some(parse_time(last)?);
            tokens.pop();
        }
    }

    if let Some(mut relative) = parse_relative(&tokens, now) {
        if let Some(time) = time {
            // a clock time needs a day to attach to
            if !relative.is_certain(DatePrecision::Day) {
                return None;
            }
            relative.set_time(&time);
        }
        return Some(relative);
    }

    let mut components = match tokens.as_slice() {
        [] => {
            // a bare time refers to today
            time.as_ref()?;
            ParsedComponents::new()
        }
        [word] => match relative_day(word, now) {
            Some(date) => {
                let mut components = ParsedComponents::new();
                components.set_date(date);
                components
            }
            None => parse_numeric_date(word).or_else(|| parse_month_day_year(&tokens))?,
        },
        [date, hour] if time.is_none() && is_short_number(hour) && is_full_date(date) => {
            time = Some(parse_time(hour)?);
            parse_numeric_date(date)?
        }
        _ => parse_month_day_year(&tokens)?,
    };

    if let Some(time) = time {
        components.set_time(&time);
    }

    Some(components)
}

/// Parses a day of the month standing on its own, such as `10` or `10th`
pub(super) fn parse_bare_day(input: &str) -> Option<ParsedComponents> {
    let day = parse_day(input.trim())?;
    Some(ParsedComponents::new().certain(DatePrecision::Day, day))
}

/// Whether a comma-separated fragment only adds a year or a time to the date before it
pub(super) fn is_date_continuation(fragment: &str) -> bool {
    let fragment = fragment.trim();
    let clock = fragment.strip_prefix("at ").unwrap_or(fragment).trim();

    parse_year(fragment).is_some()
        || ((clock.contains(':') || is_meridiem(clock)) && parse_time(clock).is_some())
}

fn parse_relative(tokens: &[&str], now: &NaiveDateTime) -> Option<ParsedComponents> {
    let mut components = ParsedComponents::new();

    match tokens {
        ["now"] => {
            components.set_date(now.date());
            components.set_time(&[
                (DatePrecision::Hour, now.hour() as i32),
                (DatePrecision::Minute, now.minute() as i32),
                (DatePrecision::Second, now.second() as i32),
            ]);
        }
        [count, unit, "ago"] => {
            let count = parse_count(count)?;
            let today = now.date();
            match unit.trim_end_matches('s') {
                "day" => {
                    components.set_date(today.checked_sub_signed(Duration::days(count.into()))?)
                }
                "week" => {
                    components.set_date(today.checked_sub_signed(Duration::weeks(count.into()))?)
                }
                "month" => {
                    let date = today.checked_sub_months(Months::new(count))?;
                    components.set(DatePrecision::Year, date.year());
                    components.set(DatePrecision::Month, date.month() as i32);
                }
                "year" => {
                    components.set(DatePrecision::Year, now.year() - i32::try_from(count).ok()?);
                }
                _ => return None,
            }
        }
        [which @ ("last" | "this" | "next"), unit @ ("month" | "year")] => {
            let offset: i32 = match *which {
                "last" => -1,
                "next" => 1,
                _ => 0,
            };
            if *unit == "year" {
                components.set(DatePrecision::Year, now.year() + offset);
            } else {
                let first = now.date().with_day(1)?;
                let date = match offset {
                    -1 => first.checked_sub_months(Months::new(1))?,
                    1 => first.checked_add_months(Months::new(1))?,
                    _ => first,
                };
                components.set(DatePrecision::Year, date.year());
                components.set(DatePrecision::Month, date.month() as i32);
            }
        }
        _ => return None,
    }

    Some(components)
}

fn relative_day(word: &str, now: &NaiveDateTime) -> Option<NaiveDate> {
    let today = now.date();
    match word {
        "today" => Some(today),
        "yesterday" => today.pred_opt(),
        "tomorrow" => today.succ_opt(),
        _ => None,
    }
}

fn parse_count(word: &str) -> Option<u32> {
    match word {
        "a" | "an" | "one" => Some(1),
        _ => word.parse().ok(),
    }
}

fn is_short_number(word: &str) -> bool {
    !word.is_empty() && word.len() <= 2 && word.chars().all(|c| c.is_ascii_digit())
}

fn is_full_date(word: &str) -> bool {
    parse_numeric_date(word).map_or(false, |c| c.is_certain(DatePrecision::Day))
}

fn is_meridiem(word: &str) -> bool {
    (word.ends_with("am") || word.ends_with("pm")) && word.starts_with(|c: char| c.is_ascii_digit())
}

/// Parses `HH`, `HH:MM`, `HH:MM:SS`, optionally followed by `am`/`pm`
fn parse_time(word: &str) -> Option<Vec<(DatePrecision, i32)>> {
    let (clock, meridiem) = match word.strip_suffix("am") {
        Some(rest) => (rest, Some(false)),
        None => match word.strip_suffix("pm") {
            Some(rest) => (rest, Some(true)),
            None => (word, None),
        },
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let fields = [
        DatePrecision::Hour,
        DatePrecision::Minute,
        DatePrecision::Second,
    ];
    let mut time = Vec::with_capacity(parts.len());

    for (field, part) in fields.iter().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let value: i32 = part.parse().ok()?;
        let max = if *field == DatePrecision::Hour { 23 } else { 59 };
        if value > max {
            return None;
        }
        time.push((*field, value));
    }

    if let Some(pm) = meridiem {
        let hour = &mut time[0].1;
        if *hour < 1 || *hour > 12 {
            return None;
        }
        *hour = match (pm, *hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    Some(time)
}

fn parse_year(word: &str) -> Option<i32> {
    if word.len() == 4 && word.chars().all(|c| c.is_ascii_digit()) {
        word.parse().ok()
    } else {
        None
    }
}

fn parse_month_number(word: &str) -> Option<i32> {
    if !is_short_number(word) {
        return None;
    }
    let month: i32 = word.parse().ok()?;
    (1..=12).contains(&month).then_some(month)
}

fn parse_day(word: &str) -> Option<i32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
        .unwrap_or(word);
    if !is_short_number(digits) {
        return None;
    }
    let day: i32 = digits.parse().ok()?;
    (1..=31).contains(&day).then_some(day)
}

fn parse_month_name(word: &str) -> Option<i32> {
    let word = word.trim_end_matches('.');
    if word.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(word))
        .map(|index| index as i32 + 1)
}

/// Parses `YYYY`, `YYYY-MM[-DD]`, `YYYY/MM[/DD]` and `DD.MM.YYYY`
fn parse_numeric_date(word: &str) -> Option<ParsedComponents> {
    if let Some(year) = parse_year(word) {
        return Some(ParsedComponents::new().certain(DatePrecision::Year, year));
    }

    if word.contains('.') {
        let parts: Vec<&str> = word.split('.').collect();
        return match parts.as_slice() {
            [day, month, year] => Some(
                ParsedComponents::new()
                    .certain(DatePrecision::Year, parse_year(year)?)
                    .certain(DatePrecision::Month, parse_month_number(month)?)
                    .certain(DatePrecision::Day, parse_day(day)?),
            ),
            _ => None,
        };
    }

    let parts: Vec<&str> = word.split(|c: char| c == '-' || c == '/').collect();
    let mut components = ParsedComponents::new();
    match parts.as_slice() {
        [year, month] => {
            components.set(DatePrecision::Year, parse_year(year)?);
            components.set(DatePrecision::Month, parse_month_number(month)?);
        }
        [year, month, day] => {
            components.set(DatePrecision::Year, parse_year(year)?);
            components.set(DatePrecision::Month, parse_month_number(month)?);
            components.set(DatePrecision::Day, parse_day(day)?);
        }
        _ => return None,
    }

    Some(components)
}

/// Parses a month name with an optional day and year in any order
fn parse_month_day_year(tokens: &[&str]) -> Option<ParsedComponents> {
    if tokens.is_empty() || tokens.len() > 3 {
        return None;
    }

    let mut month = None;
    let mut day = None;
    let mut year = None;

    for token in tokens {
        if let Some(m) = parse_month_name(token) {
            if month.replace(m).is_some() {
                return None;
            }
        } else if let Some(y) = parse_year(token) {
            if year.replace(y).is_some() {
                return None;
            }
        } else if let Some(d) = parse_day(token) {
            if day.replace(d).is_some() {
                return None;
            }
        } else {
            return None;
        }
    }

    let mut components = ParsedComponents::new().certain(DatePrecision::Month, month?);
    if let Some(year) = year {
        components.set(DatePrecision::Year, year);
    }
    if let Some(day) = day {
        components.set(DatePrecision::Day, day);
    }

    Some(components)
}
