//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

/// Domain-specific errors
///
/// These errors represent invariant violations and lookups that must not leak
/// whether an entity exists for another user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or invariant-violating input
    #[error("{0}")]
    Validation(String),

    /// Entity is absent or not accessible to the requesting user
    #[error("{0}")]
    NotFound(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Not-found error shared by "missing" and "owned by someone else"
    pub fn transaction_not_found() -> Self {
        Self::NotFound("Transaction not found".to_string())
    }

    /// Check if this is a client error (user's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
