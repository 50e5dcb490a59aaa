use crate::ec2::Ec2SnapshotId;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ec2SnapshotFilter {
    /// Matches exactly given snapshots.
    Ids(Vec<Ec2SnapshotId>),

    /// Matches snapshots that carry a tag with given key, whatever its value.
    TagKey(String),
}
