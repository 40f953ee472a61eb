//! The generic bounded polling loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, trace};

use crate::backoff::PollBackoff;
use crate::config::PollConfig;

/// Result of a single check.
///
/// `Pending` carries the state to hand to the next check; `Done` carries
/// the final value. A terminal failure is the `Err` of the check itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<P, D> {
    /// Not there yet; check again after the next backoff period.
    Pending(P),
    /// Finished.
    Done(D),
}

/// How a polling call ended without a terminal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<P, D> {
    /// A check returned `Done`.
    Done(D),

    /// The timeout elapsed while the last check was still pending.
    TimedOut {
        last: P,
        attempts: u32,
        elapsed: Duration,
    },
}

impl<P, D> PollOutcome<P, D> {
    /// Returns true if the condition was met before the timeout.
    pub fn is_done(&self) -> bool {
        matches!(self, PollOutcome::Done(_))
    }
}

/// Repeatedly run `check` until it reports `Done`, fails, or `config`'s
/// timeout elapses.
///
/// - The first check runs immediately; sleeping only happens between checks.
/// - Each check receives the state returned by the previous one, so the
///   caller always sees the latest fetched value without shared mutation.
/// - An `Err` from `check` is returned at once with no further checks.
/// - Delays follow [`PollBackoff`] and are clipped to the time remaining,
///   so a timed-out call returns no later than one period after the timeout.
pub async fn poll_until<P, D, E, F, Fut>(
    config: &PollConfig,
    initial: P,
    mut check: F,
) -> Result<PollOutcome<P, D>, E>
where
    F: FnMut(P) -> Fut,
    Fut: Future<Output = Result<Attempt<P, D>, E>>,
{
    let backoff = PollBackoff::from(config);
    let start = Instant::now();
    let mut state = initial;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        state = match check(state).await? {
            Attempt::Done(done) => {
                debug!(
                    attempts,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Poll condition met"
                );
                return Ok(PollOutcome::Done(done));
            }
            Attempt::Pending(pending) => pending,
        };

        let elapsed = start.elapsed();
        if elapsed >= config.timeout() {
            debug!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                timeout_ms = config.timeout().as_millis() as u64,
                "Poll timed out"
            );
            return Ok(PollOutcome::TimedOut {
                last: state,
                attempts,
                elapsed,
            });
        }

        let delay = backoff
            .delay(attempts - 1)
            .min(config.timeout() - elapsed);
        trace!(attempts, delay_ms = delay.as_millis() as u64, "Poll pending");
        sleep(delay).await;
    }
}
