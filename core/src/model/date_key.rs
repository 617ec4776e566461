use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TrackerError;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar day with no time component, rendered as `YYYY-MM-DD`.
///
/// Ordering is calendar ordering (year, then month, then day) because it is
/// derived from the wrapped [`NaiveDate`], not from the string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1-based month.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The following calendar day, `None` past the end of the representable range.
    pub fn next_day(&self) -> Option<Self> {
        self.0.checked_add_days(Days::new(1)).map(Self)
    }

    /// The preceding calendar day, `None` before the start of the representable range.
    pub fn previous_day(&self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(1)).map(Self)
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.year() == year && self.month() == month
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| TrackerError::InvalidDate(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_zero_padded() {
        let key = DateKey::from_ymd(2024, 2, 5).unwrap();
        assert_eq!(key.to_string(), "2024-02-05");
    }

    #[test]
    fn test_same_day_same_key_regardless_of_construction() {
        let from_parts = DateKey::from_ymd(2024, 3, 9).unwrap();
        let from_str: DateKey = "2024-03-09".parse().unwrap();
        let from_date = DateKey::from(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(from_parts, from_str);
        assert_eq!(from_str, from_date);
        assert_eq!(from_parts.to_string(), from_date.to_string());
    }

    #[test]
    fn test_ordering_follows_calendar() {
        let dec = DateKey::from_ymd(2023, 12, 31).unwrap();
        let jan = DateKey::from_ymd(2024, 1, 1).unwrap();
        let feb = DateKey::from_ymd(2024, 2, 1).unwrap();
        assert!(dec < jan);
        assert!(jan < feb);
    }

    #[test]
    fn test_next_day_crosses_month_and_leap_day() {
        let leap = DateKey::from_ymd(2024, 2, 28).unwrap();
        assert_eq!(leap.next_day().unwrap().to_string(), "2024-02-29");
        assert_eq!(leap.next_day().unwrap().next_day().unwrap().to_string(), "2024-03-01");
        let eoy = DateKey::from_ymd(2023, 12, 31).unwrap();
        assert_eq!(eoy.next_day().unwrap().to_string(), "2024-01-01");
        let march = DateKey::from_ymd(2024, 3, 1).unwrap();
        assert_eq!(march.previous_day().unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("2024-13-01".parse::<DateKey>().is_err());
        assert!("yesterday".parse::<DateKey>().is_err());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let key = DateKey::from_ymd(2024, 1, 28).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-01-28\"");
        let back: DateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
