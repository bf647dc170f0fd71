//! Domain module
//!
//! Core domain types and validation rules.

pub mod error;
pub mod money;
pub mod timestamp;
pub mod transaction;

pub use error::DomainError;
pub use money::{Money, DEFAULT_CURRENCY};
pub use timestamp::Timestamp;
pub use transaction::{NewTransaction, Transaction, TransactionType, MAX_DESCRIPTION_LEN};
