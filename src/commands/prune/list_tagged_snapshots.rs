use crate::prelude::*;
use std::collections::HashSet;

/// Returns all snapshots carrying the `BackupDate` tag, going through every
/// page EC2 hands out.
pub fn list_tagged_snapshots(ec2: &mut dyn Ec2Client) -> Result<Vec<Ec2Snapshot>> {
    let filter = Ec2SnapshotFilter::TagKey(Ec2Tag::BACKUP_DATE.into());
    let mut snapshots = Vec::new();
    let mut next_token: Option<String> = None;
    let mut seen_tokens = HashSet::new();

    loop {
        let page = ec2
            .describe_snapshots(&filter, next_token.as_deref())
            .context("Couldn't list snapshots")?;

        snapshots.extend(page.snapshots);

        match page.next_token {
            Some(token) if !seen_tokens.insert(token.clone()) => {
                bail!("EC2 returned the same page token twice: {}", token);
            }

            Some(token) => {
                next_token = Some(token);
            }

            None => {
                return Ok(snapshots);
            }
        }
    }
}
