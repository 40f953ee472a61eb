//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID is not a valid unsigned integer.
    #[error("invalid {kind} ID '{value}': expected an unsigned integer")]
    InvalidNumber { kind: &'static str, value: String },

    /// The slug contains characters a provider never assigns.
    #[error("invalid slug '{0}': must not contain whitespace, '/', '?', '#' or '%'")]
    InvalidSlug(String),
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }
}
