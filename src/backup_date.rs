use chrono::{DateTime, NaiveDate};
use std::{fmt, iter};

/// Value of the `BackupDate` tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackupDate(NaiveDate);

impl BackupDate {
    const FORMAT: &'static str = "%Y-%m-%d";

    // Snapshots tagged by earlier tooling carry locale-specific short dates
    const LEGACY_FORMATS: &'static [&'static str] = &["%m/%d/%Y", "%d.%m.%Y"];

    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses the tag's value; returns `None` for anything that doesn't look
    /// like a date, so that such snapshots are left alone.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();

        Self::LEGACY_FORMATS
            .iter()
            .chain(iter::once(&Self::FORMAT))
            .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
            .map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for BackupDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}
