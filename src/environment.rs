use crate::prelude::*;
use std::thread;
use std::time::Duration;

pub struct Environment<'a> {
    pub time: fn() -> DateTime<Utc>,
    pub sleep: fn(Duration),
    pub stdout: &'a mut dyn Write,
    pub config: &'a Config,
    pub ec2: &'a mut dyn Ec2Client,
}

impl<'a> Environment<'a> {
    pub fn new(stdout: &'a mut dyn Write, config: &'a Config, ec2: &'a mut dyn Ec2Client) -> Self {
        Self {
            time: Utc::now,
            sleep: thread::sleep,
            stdout,
            config,
            ec2,
        }
    }

    #[cfg(test)]
    pub fn test(stdout: &'a mut dyn Write, config: &'a Config, ec2: &'a mut dyn Ec2Client) -> Self {
        use chrono::TimeZone;

        colored::control::set_override(true);

        Self {
            time: || Utc.with_ymd_and_hms(2012, 8, 24, 12, 34, 56).unwrap(),
            sleep: |_| (),
            stdout,
            config,
            ec2,
        }
    }

    pub fn time(&self) -> DateTime<Utc> {
        (self.time)()
    }

    /// Dates in `BackupDate` tags are expressed in UTC.
    pub fn today(&self) -> NaiveDate {
        self.time().date_naive()
    }

    pub fn sleep(&self, duration: Duration) {
        (self.sleep)(duration)
    }
}
