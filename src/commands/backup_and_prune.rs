use super::{Backup, Prune};
use crate::prelude::*;

/// The whole run: snapshot the volume, then get rid of its expired
/// snapshots.
///
/// Pruning happens only after the new snapshot has completed, so a failed
/// backup never leaves the volume with fewer snapshots than before.
pub struct BackupAndPrune<'a, 'b> {
    env: &'a mut Environment<'b>,
    job: &'a Job,
}

impl<'a, 'b> BackupAndPrune<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, job: &'a Job) -> Self {
        Self { env, job }
    }

    pub fn run(self) -> Result<()> {
        let mut summary = Summary::default();

        if let Some(days) = &self.job.malformed_retention {
            writeln!(
                self.env.stdout,
                "{} `{}` is not a number of days, assuming 0 - every snapshot dated before today will be deleted",
                "warn:".yellow(),
                days
            )?;

            writeln!(self.env.stdout)?;
        }

        let result = Self::try_run(self.env, self.job, &mut summary);

        writeln!(self.env.stdout)?;
        write!(self.env.stdout, "{}", summary)?;

        result
    }

    fn try_run(env: &mut Environment<'_>, job: &Job, summary: &mut Summary) -> Result<()> {
        // Both steps must agree on the date; the wait in between can take
        // long enough to cross midnight
        let today = env.today();

        let snapshot = Backup::new(env, job, today, summary)
            .run()
            .with_context(|| format!("Couldn't back up {}", job.volume))?;

        writeln!(env.stdout)?;

        Prune::new(env, job, today, summary)
            .sparing(snapshot.snapshot_id)
            .run()
            .with_context(|| format!("Couldn't prune snapshots of {}", job.volume))?;

        Ok(())
    }
}
