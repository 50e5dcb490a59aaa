mod wait_for_completion;

use self::wait_for_completion::*;
use crate::prelude::*;

/// Creates a snapshot of the job's volume, tags it and waits for EC2 to
/// finish it.
pub struct Backup<'a, 'b> {
    env: &'a mut Environment<'b>,
    job: &'a Job,
    today: NaiveDate,
    summary: &'a mut Summary,
}

impl<'a, 'b> Backup<'a, 'b> {
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
            summary,
        }
    }

    pub fn run(mut self) -> Result<Ec2Snapshot> {
        writeln!(
            self.env.stdout,
            "{}",
            format!("Backing up {}", self.job.volume).bold()
        )?;

        match self.try_run() {
            Ok(snapshot) => {
                self.summary.add_created_snapshot();

                writeln!(self.env.stdout, "  {}", "[ OK ]".green())?;

                Ok(snapshot)
            }

            Err(err) => {
                self.summary.add_error();

                Err(err)
            }
        }
    }

    fn try_run(&mut self) -> Result<Ec2Snapshot> {
        let snapshot = self.create_snapshot()?;

        self.tag_snapshot(&snapshot).with_context(|| {
            format!(
                "Couldn't tag snapshot {} - it won't be pruned automatically, so please tag or delete it by hand",
                snapshot.snapshot_id
            )
        })?;

        let result = wait_for_completion(self.env, &snapshot.snapshot_id);

        if result.is_err() {
            writeln!(self.env.stdout, "  {}", "[ FAILED ]".red())?;
        }

        result.with_context(|| {
            format!(
                "Couldn't wait for snapshot {} to complete",
                snapshot.snapshot_id
            )
        })?;

        Ok(snapshot)
    }

    fn create_snapshot(&mut self) -> Result<Ec2Snapshot> {
        write!(
            self.env.stdout,
            "  - creating snapshot: {}",
            self.job.snapshot_name.as_str().italic()
        )?;

        let result = self
            .env
            .ec2
            .create_snapshot(&self.job.volume, &self.job.snapshot_name);

        match result {
            Ok(snapshot) => {
                writeln!(self.env.stdout, " -> {}", snapshot.snapshot_id)?;

                Ok(snapshot)
            }

            Err(err) => {
                writeln!(self.env.stdout, " {}", "[ FAILED ]".red())?;

                Err(err).context("Couldn't create snapshot")
            }
        }
    }

    fn tag_snapshot(&mut self, snapshot: &Ec2Snapshot) -> Result<()> {
        let backup_date = BackupDate::new(self.today);

        let tags = [
            Ec2Tag::new(Ec2Tag::NAME, &self.job.snapshot_name),
            Ec2Tag::new(Ec2Tag::BACKUP_DATE, backup_date.to_string()),
        ];

        write!(
            self.env.stdout,
            "  - tagging snapshot: {}",
            tags.iter().join(", ")
        )?;

        match self.env.ec2.create_tags(&snapshot.snapshot_id, &tags) {
            Ok(()) => {
                writeln!(self.env.stdout)?;

                Ok(())
            }

            Err(err) => {
                writeln!(self.env.stdout, " {}", "[ FAILED ]".red())?;

                Err(err.into())
            }
        }
    }
}
