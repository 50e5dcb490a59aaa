use crate::backup_date::BackupDate;
use chrono::{Days, NaiveDate};
use std::fmt;

/// How many days worth of snapshots to keep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Retention {
    days: u32,
}

impl Retention {
    pub fn days(days: u32) -> Self {
        Self { days }
    }

    /// Snapshots dated before this day are expired.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.days.into()))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn is_expired(&self, today: NaiveDate, date: BackupDate) -> bool {
        date.date() < self.cutoff(today)
    }
}

impl fmt::Display for Retention {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.days {
            1 => write!(f, "1 day"),
            days => write!(f, "{} days", days),
        }
    }
}
