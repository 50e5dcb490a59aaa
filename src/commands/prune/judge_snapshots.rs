use crate::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub snapshot: Ec2SnapshotId,
    pub decision: Decision,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Delete(BackupDate),
    Keep(BackupDate),

    /// None of the snapshot's `BackupDate` tags look like a date; contains the
    /// first one's value.
    Skip(String),
}

/// Decides what to do with each of the volume's snapshots.
///
/// Snapshots of other volumes and ones without the `BackupDate` tag are left
/// out; each snapshot appears at most once, even if it carries multiple
/// `BackupDate` tags (in which case any expired one is enough to delete it).
///
/// The `spared` snapshot is never deleted.
pub fn judge_snapshots(
    snapshots: &[Ec2Snapshot],
    volume: &Ec2VolumeId,
    spared: Option<&Ec2SnapshotId>,
    retention: Retention,
    today: NaiveDate,
) -> Vec<Verdict> {
    snapshots
        .iter()
        .filter(|snapshot| &snapshot.volume_id == volume)
        .unique_by(|snapshot| snapshot.snapshot_id.clone())
        .filter_map(|snapshot| {
            let spared = spared == Some(&snapshot.snapshot_id);
            let decision = judge_snapshot(snapshot, spared, retention, today)?;

            Some(Verdict {
                snapshot: snapshot.snapshot_id.clone(),
                decision,
            })
        })
        .collect()
}

fn judge_snapshot(
    snapshot: &Ec2Snapshot,
    spared: bool,
    retention: Retention,
    today: NaiveDate,
) -> Option<Decision> {
    let values: Vec<_> = snapshot.tag_values(Ec2Tag::BACKUP_DATE).collect();
    let dates: Vec<_> = values.iter().filter_map(|value| BackupDate::parse(value)).collect();

    let expired = dates
        .iter()
        .copied()
        .filter(|date| retention.is_expired(today, *date))
        .min();

    if let (Some(date), false) = (expired, spared) {
        return Some(Decision::Delete(date));
    }

    if let Some(date) = dates.iter().copied().max() {
        return Some(Decision::Keep(date));
    }

    values.first().map(|value| Decision::Skip(value.to_string()))
}
