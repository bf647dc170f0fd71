//! Service module
//!
//! Application service that validates caller input, talks to the store and
//! aggregates expense statistics.

mod commands;
mod error;
mod reports;
mod transaction_service;

pub use commands::RecordTransactionCommand;
pub use error::ServiceError;
pub use reports::{CategoryExpense, CategoryExpenseReport, PeriodExpenseReport};
pub use transaction_service::TransactionService;
