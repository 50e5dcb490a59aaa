use anyhow::{bail, Result};
use std::iter;
use std::time::Duration;

/// Governs how long we wait for a snapshot to complete.
///
/// Polls start `poll_interval` apart and the gap doubles after each poll (up
/// to `max_poll_interval`); once the accumulated wait would exceed `timeout`,
/// we give up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    poll_interval: Duration,
    max_poll_interval: Duration,
    timeout: Duration,
}

impl WaitPolicy {
    pub fn new(
        poll_interval: Duration,
        max_poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        if poll_interval.is_zero() {
            bail!("Poll interval must be greater than zero");
        }

        if max_poll_interval < poll_interval {
            bail!("Maximum poll interval must not be shorter than the poll interval");
        }

        Ok(Self {
            poll_interval,
            max_poll_interval,
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns delays to sleep between consecutive polls; the iterator ends
    /// when the timeout is exhausted.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        let mut next = self.poll_interval;
        let mut elapsed = Duration::ZERO;

        iter::from_fn(move || {
            let delay = next;

            if elapsed + delay > self.timeout {
                return None;
            }

            elapsed += delay;
            next = (delay * 2).min(self.max_poll_interval);

            Some(delay)
        })
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_poll_interval: Duration::from_secs(60),
            timeout: Duration::from_secs(2 * 60 * 60),
        }
    }
}
