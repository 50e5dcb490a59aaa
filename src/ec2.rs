mod clients;
mod error;
mod models;

pub use self::{clients::*, error::*, models::*};

/// Subset of the EC2 API we rely on.
///
/// Credentials and region are the implementation's business - the workflow
/// only ever sees this trait.
pub trait Ec2Client {
    fn create_snapshot(
        &mut self,
        volume: &Ec2VolumeId,
        description: &str,
    ) -> Ec2Result<Ec2Snapshot>;

    fn create_tags(&mut self, snapshot: &Ec2SnapshotId, tags: &[Ec2Tag]) -> Ec2Result<()>;

    /// Returns a single page of snapshots owned by the current account that
    /// match given filter; `next_token` comes from the previous page.
    fn describe_snapshots(
        &mut self,
        filter: &Ec2SnapshotFilter,
        next_token: Option<&str>,
    ) -> Ec2Result<Ec2SnapshotPage>;

    fn delete_snapshot(&mut self, snapshot: &Ec2SnapshotId) -> Ec2Result<()>;
}
