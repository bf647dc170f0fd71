//! Command definitions
//!
//! Commands carry raw caller input into the service.

use rust_decimal::Decimal;

use crate::domain::{Timestamp, DEFAULT_CURRENCY};

/// Command to record a new expense or income
#[derive(Debug, Clone)]
pub struct RecordTransactionCommand {
    pub user_id: String,
    /// "expense" or "income"
    pub tx_type: String,
    pub amount: Decimal,
    pub currency: String,
    pub occurred_at: Timestamp,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
}

impl RecordTransactionCommand {
    pub fn new(
        user_id: impl Into<String>,
        tx_type: impl Into<String>,
        amount: Decimal,
        occurred_at: impl Into<Timestamp>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            tx_type: tx_type.into(),
            amount,
            currency: DEFAULT_CURRENCY.to_string(),
            occurred_at: occurred_at.into(),
            category_id: None,
            account_id: None,
            description: None,
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
