use crate::prelude::*;

enum Poll {
    State(Ec2SnapshotState),

    /// EC2 is eventually consistent, so a freshly created snapshot might not
    /// show up right away.
    NotVisible,

    Unavailable(Ec2Error),
}

/// Polls EC2 until given snapshot completes, backing off according to the
/// configured `WaitPolicy`.
pub fn wait_for_completion(env: &mut Environment<'_>, snapshot: &Ec2SnapshotId) -> Result<()> {
    let config = env.config;
    let mut delays = config.wait.delays();

    loop {
        write!(env.stdout, "  - checking status: ")?;

        match poll(env, snapshot)? {
            Poll::State(Ec2SnapshotState::Completed) => {
                writeln!(env.stdout, "{}", "completed".green())?;

                return Ok(());
            }

            Poll::State(Ec2SnapshotState::Error) => {
                writeln!(env.stdout, "{}", "error".red())?;

                bail!("EC2 reported snapshot {} as failed", snapshot);
            }

            Poll::State(state) => {
                writeln!(env.stdout, "{}", state)?;
            }

            Poll::NotVisible => {
                writeln!(env.stdout, "not visible yet")?;
            }

            Poll::Unavailable(err) => {
                writeln!(env.stdout, "{} ({})", "unavailable".yellow(), err)?;
            }
        }

        let Some(delay) = delays.next() else {
            bail!(
                "Snapshot {} didn't complete within {}",
                snapshot,
                humantime::format_duration(config.wait.timeout())
            );
        };

        env.sleep(delay);
    }
}

fn poll(env: &mut Environment<'_>, snapshot: &Ec2SnapshotId) -> Result<Poll> {
    let filter = Ec2SnapshotFilter::Ids(vec![snapshot.to_owned()]);

    match env.ec2.describe_snapshots(&filter, None) {
        Ok(page) => {
            let state = page
                .snapshots
                .into_iter()
                .find(|candidate| &candidate.snapshot_id == snapshot)
                .map_or(Poll::NotVisible, |candidate| Poll::State(candidate.state));

            Ok(state)
        }

        Err(err) if matches!(err.kind(), Ec2ErrorKind::Transient | Ec2ErrorKind::NotFound) => {
            Ok(Poll::Unavailable(err))
        }

        Err(err) => Err(err).context("Couldn't check snapshot's status"),
    }
}
