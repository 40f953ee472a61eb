//! Error handling and display for the CLI.

use colored::Colorize;
use nimbus_digitalocean::{ApiError, ComputeError};
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Not authenticated. Run `nimbus auth login` to authenticate.")]
    NotAuthenticated,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

impl CliError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(hint) = hint(err) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return match cli_err {
            CliError::NotAuthenticated => Some("Run `nimbus auth login` or set DIGITALOCEAN_TOKEN."),
            CliError::NotFound { .. } => None,
        };
    }

    let api_err = match err.downcast_ref::<ComputeError>() {
        Some(ComputeError::Timeout { .. }) => {
            return Some(
                "The provider may still finish the operation. Check its state with `nimbus droplets get`.",
            )
        }
        Some(ComputeError::RemoteOperation { .. }) => {
            return Some("The provider rejected the operation. Inspect the droplet before retrying.")
        }
        Some(ComputeError::Transport(api_err)) => Some(api_err),
        _ => err.downcast_ref::<ApiError>(),
    }?;

    match api_err {
        ApiError::Unauthorized { .. } | ApiError::InvalidToken(_) => {
            Some("Your token may be revoked or mistyped. Run `nimbus auth login`.")
        }
        ApiError::Api { status: 403, .. } => Some("Your token may lack write scope for this operation."),
        ApiError::Api { status: 429, .. } => Some("Rate limited. Wait a minute and try again."),
        ApiError::Http(_) => Some("Check your network connection and API endpoint."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use nimbus_digitalocean::Operation;

    #[test]
    fn test_hint_for_not_authenticated() {
        let err = anyhow::Error::new(CliError::NotAuthenticated);
        assert!(hint(&err).unwrap().contains("auth login"));
    }

    #[test]
    fn test_hint_for_timeout() {
        let err = anyhow::Error::new(ComputeError::Timeout {
            operation: Operation::Snapshot,
            attempts: 12,
            elapsed: Duration::from_secs(3600),
        });
        assert!(hint(&err).unwrap().contains("still finish"));
    }

    #[test]
    fn test_hint_for_wrapped_unauthorized() {
        let err = anyhow::Error::new(ComputeError::Transport(ApiError::Unauthorized {
            message: "Unable to authenticate you".to_string(),
        }));
        assert!(hint(&err).unwrap().contains("auth login"));
    }

    #[test]
    fn test_no_hint_for_data_contract() {
        let err = anyhow::Error::new(ComputeError::DataContract("two links".to_string()));
        assert!(hint(&err).is_none());
    }
}
