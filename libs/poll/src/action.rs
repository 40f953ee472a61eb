//! Waiting for provider actions to complete.
//!
//! An action is the provider's handle to an asynchronous operation. Only
//! its status is interpreted here; every other field of the provider's
//! record is carried through untouched.

use std::fmt;

use async_trait::async_trait;
use tracing::warn;

use crate::config::PollConfig;
use crate::error::WaitError;
use crate::retry::{poll_until, Attempt, PollOutcome};

/// Status of a provider action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    /// The operation is still running.
    InProgress,
    /// The operation finished successfully.
    Completed,
    /// The operation failed on the provider side.
    Errored,
    /// A status value this client does not know.
    Unknown(String),
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::InProgress => write!(f, "in-progress"),
            ActionStatus::Completed => write!(f, "completed"),
            ActionStatus::Errored => write!(f, "errored"),
            ActionStatus::Unknown(other) => write!(f, "unknown({other})"),
        }
    }
}

/// A provider record that describes an action.
pub trait TrackedAction: Send {
    /// Provider-assigned action identifier.
    type Id: Clone + fmt::Debug + fmt::Display + Send + Sync;

    fn id(&self) -> Self::Id;

    fn status(&self) -> ActionStatus;
}

/// Identifier type of a fetcher's actions.
pub type ActionIdOf<F> = <<F as ActionFetcher>::Action as TrackedAction>::Id;

/// Fetches the current state of an action from the provider.
#[async_trait]
pub trait ActionFetcher: Send + Sync {
    type Action: TrackedAction;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_action(&self, id: &ActionIdOf<Self>) -> Result<Self::Action, Self::Error>;
}

/// The caller's handle on one in-flight action.
///
/// Created when a mutating call returns and replaced wholesale by every
/// fetch. Owned by a single polling call.
#[derive(Debug, Clone)]
pub enum ActionRef<A: TrackedAction> {
    /// Only the id is known (e.g. from a link in a create response).
    Issued(A::Id),
    /// The last fetched (or returned) action record.
    Observed(A),
}

impl<A: TrackedAction> ActionRef<A> {
    pub fn id(&self) -> A::Id {
        match self {
            ActionRef::Issued(id) => id.clone(),
            ActionRef::Observed(action) => action.id(),
        }
    }

    /// Last known status, if any record has been seen yet.
    pub fn status(&self) -> Option<ActionStatus> {
        match self {
            ActionRef::Issued(_) => None,
            ActionRef::Observed(action) => Some(action.status()),
        }
    }
}

impl<A: TrackedAction> From<A> for ActionRef<A> {
    fn from(action: A) -> Self {
        ActionRef::Observed(action)
    }
}

/// Fetch the action once and classify it.
///
/// - `Completed` → `Done` with the fetched record
/// - `InProgress` → `Pending` with the fetched record replacing `action`
/// - `Errored` or unrecognised → `WaitError::RemoteFailed`
pub async fn check_action<F>(
    fetcher: &F,
    action: ActionRef<F::Action>,
) -> Result<Attempt<ActionRef<F::Action>, F::Action>, WaitError<F::Error>>
where
    F: ActionFetcher + ?Sized,
{
    let id = action.id();
    let current = fetcher
        .fetch_action(&id)
        .await
        .map_err(WaitError::Transport)?;

    match current.status() {
        ActionStatus::Completed => Ok(Attempt::Done(current)),
        ActionStatus::InProgress => Ok(Attempt::Pending(ActionRef::Observed(current))),
        status => Err(WaitError::RemoteFailed {
            action_id: id.to_string(),
            status,
        }),
    }
}

/// Poll an action until it completes, fails, or `config` times out.
///
/// Returns the completed action record.
pub async fn await_action<F>(
    fetcher: &F,
    config: &PollConfig,
    action: ActionRef<F::Action>,
) -> Result<F::Action, WaitError<F::Error>>
where
    F: ActionFetcher + ?Sized,
{
    let action_id = action.id();

    let outcome = poll_until(config, action, move |current| check_action(fetcher, current)).await?;

    match outcome {
        PollOutcome::Done(done) => Ok(done),
        PollOutcome::TimedOut {
            last,
            attempts,
            elapsed,
        } => {
            let last_status = last.status();
            warn!(
                action_id = %action_id,
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "Action did not complete before timeout"
            );
            Err(WaitError::TimedOut {
                attempts,
                elapsed,
                last_status,
            })
        }
    }
}
