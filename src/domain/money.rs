//! Money type
//!
//! Domain primitive for monetary values with business rule validation.
//! All values are validated at construction time, ensuring invalid money
//! cannot exist in the system.

use rust_decimal::Decimal;
use std::fmt;

use super::DomainError;

/// Required length of an ISO-4217 style currency code
const CURRENCY_CODE_LEN: usize = 3;

/// Currency used when a request does not name one
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Money represents a validated positive amount in a single currency.
///
/// # Invariants
/// - Amount is always positive (> 0)
/// - Currency is exactly 3 characters
///
/// No rounding is applied: the amount keeps whatever scale it was built with.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use expense_tracker::domain::Money;
///
/// let money = Money::new(Decimal::new(1050, 2), "RUB").unwrap();
/// assert_eq!(money.amount(), Decimal::new(1050, 2));
/// assert_eq!(money.currency(), "RUB");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Create new Money with validation.
    ///
    /// # Errors
    /// `DomainError::Validation` if the amount is not positive or the
    /// currency is not exactly 3 characters long.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self, DomainError> {
        let currency = currency.into();

        if amount <= Decimal::ZERO {
            return Err(DomainError::validation("Amount must be greater than 0"));
        }

        if currency.chars().count() != CURRENCY_CODE_LEN {
            return Err(DomainError::validation(
                "Currency must be a 3-letter code (e.g. RUB)",
            ));
        }

        Ok(Self { amount, currency })
    }

    /// Get the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the currency code
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
