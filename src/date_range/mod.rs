//! Date range resolution
//!
//! This module turns free-text date expressions into calendar-aligned ranges:
//! - Splitting the input into expressions (`,`, `;`, `and`)
//! - Recognizing ranges (`A to B`, `from A to B`, `A - B`, `A .. B`)
//! - Rounding each end to the precision it was stated with
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use radio_music_collector::date_range::{resolve_date_ranges, DatePrecision};
//!
//! let now = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let set = resolve_date_ranges("2023", &now).unwrap();
//! assert_eq!(set.ranges[0].precision, DatePrecision::Year);
//! ```

mod parser;
mod precision;

pub use parser::{parse_component, ParsedComponents};

use parser::{is_date_continuation, parse_bare_day};
pub use precision::DatePrecision;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Errors raised while resolving date expressions
#[derive(Debug, Error)]
pub enum DateError {
    #[error("failed to parse date '{0}'")]
    Unparseable(String),

    #[error("date '{0}' has no components specified")]
    NoPrecision(String),

    #[error("date '{0}' does not exist")]
    InvalidDate(String),
}

/// A calendar-aligned interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The finer of the precisions the two ends were stated with
    pub precision: DatePrecision,

    /// Inclusive start, rounded down
    pub start: NaiveDateTime,

    /// Inclusive end, rounded up to the last millisecond of its unit
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Calendar days touched by the range
    ///
    /// Steps one day at a time from `start` while strictly before `end`.
    pub fn days(&self) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut cursor = self.start;

        while cursor < self.end {
            days.push(cursor.date());
            match cursor.checked_add_signed(Duration::days(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        days
    }
}

/// Ranges resolved from one date argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRangeSet {
    /// The argument as given, used to name output files
    pub raw: String,

    pub ranges: Vec<DateRange>,
}

/// Resolves a free-text date argument into one or more ranges
///
/// # Arguments
///
/// * `input` - The date argument, e.g. `2023`, `march to may 2023`, `yesterday`
/// * `now` - Reference time for relative and partial dates
///
/// # Returns
///
/// * `Ok(DateRangeSet)` - At least one range was recognized
/// * `Err(DateError)` - Nothing was recognized, or a recognized date is invalid
pub fn resolve_date_ranges(input: &str, now: &NaiveDateTime) -> Result<DateRangeSet, DateError> {
    let mut ranges = Vec::new();

    for expression in split_expressions(input, now) {
        let (start, end) = match parse_expression(&expression, now) {
            Some(parsed) => parsed,
            None => {
                tracing::warn!("Ignoring unrecognized date expression '{}'", expression);
                continue;
            }
        };

        let range = build_range(&expression, &start, &end, now)?;
        if range.start > range.end {
            tracing::warn!(
                "Date range '{}' ends before it starts and selects nothing",
                expression
            );
        }
        ranges.push(range);
    }

    if ranges.is_empty() {
        return Err(DateError::Unparseable(input.to_string()));
    }

    Ok(DateRangeSet {
        raw: input.to_string(),
        ranges,
    })
}

/// Resolves a single day, the day the first range starts on
pub fn parse_date(input: &str, now: &NaiveDateTime) -> Result<NaiveDate, DateError> {
    let set = resolve_date_ranges(input, now)?;
    set.ranges
        .first()
        .map(|range| range.start.date())
        .ok_or_else(|| DateError::Unparseable(input.to_string()))
}

fn split_expressions(input: &str, now: &NaiveDateTime) -> Vec<String> {
    let lowered = input.to_lowercase();
    let mut expressions = Vec::new();

    for part in lowered.split(';') {
        for clause in part.split(" and ") {
            expressions.extend(join_comma_fragments(clause, now));
        }
    }

    expressions.retain(|e| !e.is_empty());
    expressions
}

/// Splits on commas, rejoining a trailing year or time with the date before it
///
/// `march 5th, 2023` and `yesterday, 14:00` stay single expressions while
/// `2023-01, 2023-03` is two.
fn join_comma_fragments(clause: &str, now: &NaiveDateTime) -> Vec<String> {
    let mut fragments: Vec<String> = Vec::new();

    for fragment in clause.split(',').map(str::trim) {
        if let Some(previous) = fragments.last_mut() {
            if is_date_continuation(fragment) {
                let joined = format!("{} {}", previous, fragment);
                if parse_expression(&joined, now).is_some() {
                    *previous = joined;
                    continue;
                }
            }
        }
        fragments.push(fragment.to_string());
    }

    fragments
}

fn split_range(expression: &str) -> (&str, Option<&str>) {
    let expression = expression.strip_prefix("from ").unwrap_or(expression);

    for separator in [" to ", " until ", " till ", "..", " - "] {
        if let Some((start, end)) = expression.split_once(separator) {
            return (start.trim(), Some(end.trim()));
        }
    }

    (expression, None)
}

fn parse_expression(
    expression: &str,
    now: &NaiveDateTime,
) -> Option<(ParsedComponents, ParsedComponents)> {
    let (start, end) = split_range(expression);

    let Some(end) = end else {
        let start = parse_component(start, now)?;
        return Some((start.clone(), start));
    };

    // one side may be a bare day taking its month from the other, `march 5 to 10`
    let (start, end) = match (parse_component(start, now), parse_component(end, now)) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) if start.is_certain(DatePrecision::Month) => {
            (start, parse_bare_day(end)?)
        }
        (None, Some(end)) if end.is_certain(DatePrecision::Month) => (parse_bare_day(start)?, end),
        _ => return None,
    };

    let mut start_filled = start.clone();
    start_filled.inherit_from(&end);
    let mut end_filled = end;
    end_filled.inherit_from(&start);

    Some((start_filled, end_filled))
}

fn build_range(
    expression: &str,
    start: &ParsedComponents,
    end: &ParsedComponents,
    now: &NaiveDateTime,
) -> Result<DateRange, DateError> {
    let no_precision = || DateError::NoPrecision(expression.to_string());
    let start_precision = start.precision().ok_or_else(no_precision)?;
    let end_precision = end.precision().ok_or_else(no_precision)?;

    let invalid = || DateError::InvalidDate(expression.to_string());
    let start_at = start.to_datetime(now).ok_or_else(invalid)?;
    let end_at = end.to_datetime(now).ok_or_else(invalid)?;

    Ok(DateRange {
        precision: start_precision.max(end_precision),
        start: start_precision.floor(start_at),
        end: end_precision.ceil(end_at),
    })
}
