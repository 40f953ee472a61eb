//! Waiting for a resource to disappear.
//!
//! Some deletes are synchronous over HTTP while the resource lingers on the
//! provider side. Completion is detected when a lookup by id returns
//! "not found".

use std::fmt;

use async_trait::async_trait;
use tracing::warn;

use crate::config::PollConfig;
use crate::error::WaitError;
use crate::retry::{poll_until, Attempt, PollOutcome};

/// Looks up a resource by id. `Ok(None)` means the provider does not know it.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    type Id: fmt::Display + Send + Sync;
    type Resource: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn find(&self, id: &Self::Id) -> Result<Option<Self::Resource>, Self::Error>;
}

/// Returns `true` once the resource is gone, `false` while it is present.
///
/// Lookup failures are returned as errors, never read as "still present".
pub async fn check_terminated<L>(lookup: &L, id: &L::Id) -> Result<bool, L::Error>
where
    L: ResourceLookup + ?Sized,
{
    Ok(lookup.find(id).await?.is_none())
}

/// Poll until the resource is gone or `config` times out.
pub async fn await_termination<L>(
    lookup: &L,
    config: &PollConfig,
    id: &L::Id,
) -> Result<(), WaitError<L::Error>>
where
    L: ResourceLookup + ?Sized,
{
    let outcome = poll_until(config, (), move |()| async move {
        let gone = check_terminated(lookup, id)
            .await
            .map_err(WaitError::Transport)?;
        Ok::<_, WaitError<L::Error>>(if gone {
            Attempt::Done(())
        } else {
            Attempt::Pending(())
        })
    })
    .await?;

    match outcome {
        PollOutcome::Done(()) => Ok(()),
        PollOutcome::TimedOut {
            attempts, elapsed, ..
        } => {
            warn!(
                resource_id = %id,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Resource still present after timeout"
            );
            Err(WaitError::TimedOut {
                attempts,
                elapsed,
                last_status: None,
            })
        }
    }
}
