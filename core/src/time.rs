use chrono::{Datelike, Days, Local, NaiveDate};

use crate::error::{Result, TrackerError};
use crate::model::DateKey;

/// Source of "today" as a local calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Parses a day relative to `today`.
///
/// Accepts `today`/`tod`, `yesterday`/`yes`, `-Nd` (N days ago) and `YYYY-MM-DD`.
pub fn parse_day(input: &str, today: NaiveDate) -> Result<DateKey> {
    let input = input.trim();
    let err = || TrackerError::InvalidDate(input.to_string());

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(DateKey::new(today)),
        "yesterday" | "yes" => return DateKey::new(today).previous_day().ok_or_else(err),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('-') {
        let num_str = rest.strip_suffix('d').ok_or_else(err)?;
        let count: u64 = num_str.parse().map_err(|_| err())?;
        return today
            .checked_sub_days(Days::new(count))
            .map(DateKey::new)
            .ok_or_else(err);
    }

    input.parse::<DateKey>()
}

/// Parses a month relative to `today` into `(year, 1-based month)`.
///
/// Accepts `this`, `last`/`prev`, `next` and `YYYY-MM`.
pub fn parse_month(input: &str, today: NaiveDate) -> Result<(i32, u32)> {
    let input = input.trim();
    let err = || TrackerError::InvalidMonth(input.to_string());

    match input.to_lowercase().as_str() {
        "this" | "current" => return Ok((today.year(), today.month())),
        "last" | "prev" => return Ok(shift_month(today.year(), today.month(), -1)),
        "next" => return Ok(shift_month(today.year(), today.month(), 1)),
        _ => {}
    }

    let (year_str, month_str) = input.split_once('-').ok_or_else(err)?;
    let year: i32 = year_str.parse().map_err(|_| err())?;
    let month: u32 = month_str.parse().map_err(|_| err())?;
    if !(1..=12).contains(&month) {
        return Err(err());
    }
    Ok((year, month))
}

/// Moves `(year, month)` by `delta` months, wrapping across years.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let zero_based = year * 12 + month as i32 - 1 + delta;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}
