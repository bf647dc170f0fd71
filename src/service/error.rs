//! Service Errors

use crate::domain::DomainError;
use crate::store::StoreError;

/// Errors returned by [`super::TransactionService`]
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Validation or not-found outcome
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ServiceError::Domain(DomainError::Validation(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Domain(DomainError::NotFound(_)))
    }
}
