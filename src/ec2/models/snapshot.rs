use super::serde::null_to_default;
use crate::ec2::{Ec2SnapshotId, Ec2SnapshotState, Ec2Tag, Ec2VolumeId};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ec2Snapshot {
    pub snapshot_id: Ec2SnapshotId,
    pub volume_id: Ec2VolumeId,
    pub state: Ec2SnapshotState,

    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,

    // `create-snapshot` omits `Tags` altogether when none were requested
    #[serde(default, deserialize_with = "null_to_default")]
    pub tags: Vec<Ec2Tag>,
}

impl Ec2Snapshot {
    /// Returns values of all tags with given key, in the order EC2 reported
    /// them.
    pub fn tag_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.tags
            .iter()
            .filter(move |tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}
