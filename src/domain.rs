use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DateFormatError;

/// A feast day without a year. Serialized as the 4-character `MMDD` code.
///
/// Ordering is `(month, day)`, which matches the lexicographic order of the
/// code for every value the scrapers and the decoder can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// No days-per-month check: February 30 is representable.
    pub fn new(month: u32, day: u32) -> Self {
        CalendarDate { month, day }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn code(&self) -> String {
        self.to_string()
    }
}

impl From<chrono::NaiveDate> for CalendarDate {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        CalendarDate::new(date.month(), date.day())
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = DateFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 {
            return Err(DateFormatError::Length(s.to_string()));
        }
        let month = two_digits(s, ..2).ok_or_else(|| DateFormatError::Month(s.to_string()))?;
        let day = two_digits(s, 2..).ok_or_else(|| DateFormatError::Day(s.to_string()))?;
        Ok(CalendarDate::new(month, day))
    }
}

/// ASCII digits only: `u32::from_str` would also take a leading `+`.
/// `get` keeps a multi-byte char straddling the split from panicking.
fn two_digits<R>(s: &str, range: R) -> Option<u32>
where
    R: std::slice::SliceIndex<str, Output = str>,
{
    let part = s.get(range)?;
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One day's names as found in (or merged from) a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameDay {
    pub date: CalendarDate,
    pub names: Vec<String>,
}

impl NameDay {
    pub fn new(date: CalendarDate, names: Vec<String>) -> Self {
        NameDay { date, names }
    }
}

/// Records in source order. Dates may repeat until the set has been merged.
pub type Dataset = Vec<NameDay>;

/// Number of distinct names across a dataset.
pub fn unique_names(dataset: &[NameDay]) -> usize {
    dataset
        .iter()
        .flat_map(|d| d.names.iter())
        .collect::<std::collections::HashSet<_>>()
        .len()
}

// ── Tests ──
