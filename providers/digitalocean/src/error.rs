//! Error types for the DigitalOcean provider.

use std::fmt;
use std::time::Duration;

use nimbus_poll::{ActionStatus, WaitError};
use thiserror::Error;

/// A failed call to the DigitalOcean API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The token was missing, revoked or malformed.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("invalid API token: {0}")]
    InvalidToken(String),

    /// A non-2xx response.
    #[error("API error {status} ({id}): {message}")]
    Api {
        status: u16,
        id: String,
        message: String,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to decode `{field}` from response: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// The lifecycle operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    PowerOn,
    PowerOff,
    Shutdown,
    Reboot,
    PowerCycle,
    Delete,
    Snapshot,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::PowerOn => write!(f, "power on"),
            Operation::PowerOff => write!(f, "power off"),
            Operation::Shutdown => write!(f, "shutdown"),
            Operation::Reboot => write!(f, "reboot"),
            Operation::PowerCycle => write!(f, "power cycle"),
            Operation::Delete => write!(f, "delete"),
            Operation::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Errors surfaced by compute operations.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// The HTTP call failed. Not retried.
    #[error(transparent)]
    Transport(#[from] ApiError),

    /// The provider reported the action as failed.
    #[error("{operation} failed: action {action_id} ended with status {status}")]
    RemoteOperation {
        operation: Operation,
        action_id: String,
        status: ActionStatus,
    },

    /// The wait gave up. The remote operation may still complete.
    #[error("{operation} did not finish within {elapsed:?} ({attempts} attempts)")]
    Timeout {
        operation: Operation,
        attempts: u32,
        elapsed: Duration,
    },

    /// The provider's response broke an expectation of this client.
    #[error("unexpected provider response: {0}")]
    DataContract(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ComputeError {
    /// Attach the operation to a polling failure.
    pub fn from_wait(operation: Operation, err: WaitError<ApiError>) -> Self {
        match err {
            WaitError::Transport(e) => ComputeError::Transport(e),
            WaitError::RemoteFailed { action_id, status } => ComputeError::RemoteOperation {
                operation,
                action_id,
                status,
            },
            WaitError::TimedOut {
                attempts, elapsed, ..
            } => ComputeError::Timeout {
                operation,
                attempts,
                elapsed,
            },
        }
    }

    pub fn not_found(kind: &'static str, id: impl fmt::Display) -> Self {
        ComputeError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if the outcome of the remote operation is unknown.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ComputeError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wait_remote_failed() {
        let err = ComputeError::from_wait(
            Operation::PowerOff,
            WaitError::RemoteFailed {
                action_id: "36804636".to_string(),
                status: ActionStatus::Errored,
            },
        );

        assert_eq!(
            err.to_string(),
            "power off failed: action 36804636 ended with status errored"
        );
    }

    #[test]
    fn test_from_wait_timeout() {
        let err = ComputeError::from_wait(
            Operation::Snapshot,
            WaitError::TimedOut {
                attempts: 7,
                elapsed: Duration::from_secs(3600),
                last_status: Some(ActionStatus::InProgress),
            },
        );

        assert!(err.is_timeout());
        assert!(matches!(
            err,
            ComputeError::Timeout {
                operation: Operation::Snapshot,
                attempts: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Api {
            status: 422,
            id: "unprocessable_entity".to_string(),
            message: "Name is already in use".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            ApiError::Unauthorized {
                message: "Unable to authenticate you".to_string()
            }
            .status(),
            Some(401)
        );
        assert_eq!(ApiError::MissingField("droplet").status(), None);
    }
}
