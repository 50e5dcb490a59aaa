use crate::ec2::Ec2VolumeId;
use crate::retention::Retention;
use thiserror::Error;

/// What to back up and for how long to keep it, as given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub volume: Ec2VolumeId,
    pub snapshot_name: String,
    pub retention: Retention,

    /// Set when the retention couldn't be parsed and we fell back to zero
    /// days; contains the original text.
    pub malformed_retention: Option<String>,
}

impl Job {
    pub fn new(volume: &str, days_to_hold: &str, snapshot_name: &str) -> Result<Self, JobError> {
        let volume = volume.trim();
        let snapshot_name = snapshot_name.trim();

        if volume.is_empty() {
            return Err(JobError::BlankVolumeId);
        }

        if snapshot_name.is_empty() {
            return Err(JobError::BlankSnapshotName);
        }

        let (retention, malformed_retention) = match days_to_hold.trim().parse::<i64>() {
            Ok(days) if days < 0 => {
                return Err(JobError::NegativeRetention(days));
            }

            Ok(days) => {
                let days = u32::try_from(days)
                    .map_err(|_| JobError::RetentionTooLong(days))?;

                (Retention::days(days), None)
            }

            Err(_) => (Retention::default(), Some(days_to_hold.to_string())),
        };

        Ok(Self {
            volume: Ec2VolumeId::new(volume),
            snapshot_name: snapshot_name.into(),
            retention,
            malformed_retention,
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobError {
    #[error("volume id must not be blank")]
    BlankVolumeId,

    #[error("snapshot name must not be blank")]
    BlankSnapshotName,

    #[error("days to hold must not be negative (got {0})")]
    NegativeRetention(i64),

    #[error("days to hold is too large (got {0})")]
    RetentionTooLong(i64),
}
