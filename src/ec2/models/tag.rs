use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ec2Tag {
    pub key: String,
    pub value: String,
}

impl Ec2Tag {
    /// Human-readable label shown in the EC2 console.
    pub const NAME: &'static str = "Name";

    /// Day the snapshot was taken on; its presence marks snapshots managed by
    /// us.
    pub const BACKUP_DATE: &'static str = "BackupDate";

    pub fn new(key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        Self {
            key: key.as_ref().into(),
            value: value.as_ref().into(),
        }
    }
}

impl fmt::Display for Ec2Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
