//! Expense Tracker Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod service;
pub mod store;
mod error;

pub use config::Config;
pub use domain::{DomainError, Money, Timestamp, Transaction, TransactionType};
pub use error::{AppError, AppResult, ErrorResponse};
pub use service::{ServiceError, TransactionService};
pub use store::{
    InMemoryTransactionRepository, PgTransactionRepository, StoreError, TransactionRepository,
};
