//! Error types for polling.

use std::time::Duration;

use thiserror::Error;

use crate::action::ActionStatus;

/// Invalid poll timing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The initial poll period is zero.
    #[error("initial poll period must be greater than zero")]
    ZeroPeriod,

    /// The initial poll period exceeds the maximum.
    #[error("initial poll period {initial:?} exceeds max poll period {max:?}")]
    PeriodOrder { initial: Duration, max: Duration },
}

/// Why a wait did not produce a result.
///
/// `E` is the error of the underlying fetch. It is never retried here:
/// retrying transport failures belongs to the transport.
#[derive(Debug, Error)]
pub enum WaitError<E> {
    /// Fetching the action or resource failed.
    #[error("fetch failed while polling: {0}")]
    Transport(#[source] E),

    /// The provider reported the action as failed (or in a status we do
    /// not recognise).
    #[error("action {action_id} ended with status {status}")]
    RemoteFailed {
        action_id: String,
        status: ActionStatus,
    },

    /// The configured timeout elapsed first. The remote operation may
    /// still complete later.
    #[error("timed out after {elapsed:?} ({attempts} attempts)")]
    TimedOut {
        attempts: u32,
        elapsed: Duration,
        last_status: Option<ActionStatus>,
    },
}

impl<E> WaitError<E> {
    /// Returns true if the wait ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::TimedOut { .. })
    }
}
