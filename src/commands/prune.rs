mod judge_snapshots;
mod list_tagged_snapshots;

use self::{judge_snapshots::*, list_tagged_snapshots::*};
use crate::prelude::*;

/// Deletes the job's volume snapshots whose `BackupDate` falls outside the
/// retention period.
pub struct Prune<'a, 'b> {
    env: &'a mut Environment<'b>,
    job: &'a Job,
    today: NaiveDate,
    spared: Option<Ec2SnapshotId>,
    summary: &'a mut Summary,
}

impl<'a, 'b> Prune<'a, 'b> {
    pub fn new(
        env: &'a mut Environment<'b>,
        job: &'a Job,
        today: NaiveDate,
        summary: &'a mut Summary,
    ) -> Self {
        Self {
            env,
            job,
            today,
            spared: None,
            summary,
        }
    }

    /// Keeps given snapshot no matter its `BackupDate`; used for the one
    /// that has just been created.
    pub fn sparing(mut self, snapshot: Ec2SnapshotId) -> Self {
        self.spared = Some(snapshot);
        self
    }

    pub fn run(mut self) -> Result<()> {
        let today = self.today;
        let cutoff = BackupDate::new(self.job.retention.cutoff(today));

        writeln!(
            self.env.stdout,
            "{}",
            format!(
                "Pruning snapshots of {} older than {} (dated before {})",
                self.job.volume, self.job.retention, cutoff
            )
            .bold()
        )?;

        let snapshots = list_tagged_snapshots(self.env.ec2)?;
        let verdicts = judge_snapshots(
            &snapshots,
            &self.job.volume,
            self.spared.as_ref(),
            self.job.retention,
            today,
        );

        if verdicts.is_empty() {
            writeln!(self.env.stdout, "  - found no snapshots")?;
        }

        let mut failed = 0;
        let mut first_err = None;

        for verdict in verdicts {
            if let Err(err) = self.process_verdict(verdict) {
                failed += 1;
                first_err.get_or_insert(err);
            }
        }

        if let Some(err) = first_err {
            return Err(err.context(format!(
                "Couldn't delete {} of the expired snapshots",
                failed
            )));
        }

        Ok(())
    }

    fn process_verdict(&mut self, verdict: Verdict) -> Result<()> {
        let snapshot = &verdict.snapshot;

        match verdict.decision {
            Decision::Keep(date) => {
                self.summary.add_kept_snapshot();

                writeln!(
                    self.env.stdout,
                    "  - keeping snapshot: {} ({})",
                    snapshot, date
                )?;
            }

            Decision::Skip(value) => {
                self.summary.add_skipped_snapshot();

                writeln!(
                    self.env.stdout,
                    "  - {} snapshot: {} (unrecognized {}: `{}`)",
                    "skipping".yellow(),
                    snapshot,
                    Ec2Tag::BACKUP_DATE,
                    value
                )?;
            }

            Decision::Delete(date) => {
                write!(
                    self.env.stdout,
                    "  - deleting snapshot: {} ({})",
                    snapshot, date
                )?;

                self.delete_snapshot(snapshot)?;
            }
        }

        Ok(())
    }

    fn delete_snapshot(&mut self, snapshot: &Ec2SnapshotId) -> Result<()> {
        match self.env.ec2.delete_snapshot(snapshot) {
            Ok(()) => {
                self.summary.add_deleted_snapshot();

                writeln!(self.env.stdout, " {}", "[ OK ]".green())?;
            }

            // Someone else (e.g. a concurrent run) got there first
            Err(err) if err.kind() == Ec2ErrorKind::NotFound => {
                writeln!(self.env.stdout, " {}", "[ ALREADY GONE ]".yellow())?;
            }

            Err(err) => {
                self.summary.add_error();

                writeln!(self.env.stdout, " {}", "[ FAILED ]".red())?;
                writeln!(self.env.stdout, "    {}", err)?;

                return Err(err).with_context(|| format!("Couldn't delete snapshot {}", snapshot));
            }
        }

        Ok(())
    }
}
