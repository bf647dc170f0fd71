//! Aggregation results
//!
//! Expense totals computed over a set of transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::domain::{DomainError, Transaction};

/// Expense total for one category (`None` = uncategorized)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryExpense {
    pub category_id: Option<String>,
    pub total_expense: Decimal,
}

/// Result of a by-categories query
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryExpenseReport {
    pub transactions: Vec<Transaction>,
    pub total_expense: Decimal,
    /// One entry per requested category, in request order
    pub expense_by_category: Vec<CategoryExpense>,
}

impl CategoryExpenseReport {
    /// Expense total for a category, if it is part of the report
    pub fn expense_for(&self, category_id: &str) -> Option<Decimal> {
        find_total(&self.expense_by_category, Some(category_id))
    }
}

/// Result of a by-period query
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodExpenseReport {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub total_expense: Decimal,
    /// Only categories that occurred, in first-seen order
    pub expense_by_category: Vec<CategoryExpense>,
}

impl PeriodExpenseReport {
    /// Expense total for a category (`None` = uncategorized), if any occurred
    pub fn expense_for(&self, category_id: Option<&str>) -> Option<Decimal> {
        find_total(&self.expense_by_category, category_id)
    }
}

fn find_total(entries: &[CategoryExpense], category_id: Option<&str>) -> Option<Decimal> {
    entries
        .iter()
        .find(|entry| entry.category_id.as_deref() == category_id)
        .map(|entry| entry.total_expense)
}

/// Add an expense to a running total, failing instead of overflowing
pub(crate) fn add_expense(total: Decimal, amount: Decimal) -> Result<Decimal, DomainError> {
    total
        .checked_add(amount)
        .ok_or_else(|| DomainError::validation("Expense total overflow"))
}

/// Insertion-ordered running sums keyed by category.
#[derive(Debug, Default)]
pub(crate) struct ExpenseTally {
    entries: Vec<CategoryExpense>,
    positions: HashMap<Option<String>, usize>,
}

impl ExpenseTally {
    /// Tally with a zero entry for each id
    pub(crate) fn seeded<'a>(category_ids: impl IntoIterator<Item = &'a String>) -> Self {
        let mut tally = Self::default();
        for category_id in category_ids {
            tally.slot(Some(category_id.as_str()));
        }
        tally
    }

    pub(crate) fn add(
        &mut self,
        category_id: Option<&str>,
        amount: Decimal,
    ) -> Result<(), DomainError> {
        let index = self.slot(category_id);
        let entry = &mut self.entries[index];
        entry.total_expense = add_expense(entry.total_expense, amount)?;
        Ok(())
    }

    pub(crate) fn into_entries(self) -> Vec<CategoryExpense> {
        self.entries
    }

    fn slot(&mut self, category_id: Option<&str>) -> usize {
        let key = category_id.map(str::to_string);
        if let Some(&index) = self.positions.get(&key) {
            return index;
        }

        let index = self.entries.len();
        self.entries.push(CategoryExpense {
            category_id: key.clone(),
            total_expense: Decimal::ZERO,
        });
        self.positions.insert(key, index);
        index
    }
}
