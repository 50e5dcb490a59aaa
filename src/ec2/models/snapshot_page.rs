use super::serde::null_to_default;
use crate::ec2::Ec2Snapshot;
use serde::Deserialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ec2SnapshotPage {
    #[serde(default, deserialize_with = "null_to_default")]
    pub snapshots: Vec<Ec2Snapshot>,

    /// Present when there are more snapshots to fetch; pass it back to
    /// `describe_snapshots()` to get the next page.
    #[serde(default)]
    pub next_token: Option<String>,
}
