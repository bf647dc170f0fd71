//! Transaction Service
//!
//! Records transactions and computes expense statistics on top of a
//! [`TransactionRepository`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::domain::{DomainError, Money, NewTransaction, Timestamp, Transaction, TransactionType};
use crate::store::TransactionRepository;

use super::reports::{add_expense, ExpenseTally};
use super::{CategoryExpenseReport, PeriodExpenseReport, RecordTransactionCommand, ServiceError};

/// Application service for transactions
#[derive(Debug, Clone)]
pub struct TransactionService<R> {
    repo: R,
}

impl<R: TransactionRepository> TransactionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validate and persist a new transaction
    pub async fn record_transaction(
        &self,
        command: RecordTransactionCommand,
    ) -> Result<Transaction, ServiceError> {
        let tx_type: TransactionType = command.tx_type.parse()?;
        let money = Money::new(command.amount, command.currency)?;

        let transaction = Transaction::create(NewTransaction {
            user_id: command.user_id,
            tx_type,
            money,
            occurred_at: command.occurred_at.to_utc(),
            category_id: command.category_id,
            account_id: command.account_id,
            description: command.description,
        })?;

        self.repo.add(&transaction).await?;

        tracing::info!(
            event = "RecordTransaction",
            user_id = %transaction.user_id,
            transaction_id = %transaction.id,
            tx_type = %transaction.tx_type,
            amount = %transaction.money.amount(),
            currency = %transaction.money.currency(),
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Fetch a transaction owned by `user_id`.
    ///
    /// Missing and foreign-owned transactions produce the same error.
    pub async fn get_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
    ) -> Result<Transaction, ServiceError> {
        tracing::debug!(event = "GetTransaction", user_id, transaction_id);

        match self.repo.get(transaction_id).await? {
            Some(transaction) if transaction.user_id == user_id => Ok(transaction),
            _ => Err(DomainError::transaction_not_found().into()),
        }
    }

    /// All transactions of a user, newest created first
    pub async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ServiceError> {
        let transactions = self.repo.list_by_user(user_id).await?;
        tracing::debug!(event = "ListTransactions", user_id, count = transactions.len());
        Ok(transactions)
    }

    /// Transactions in any of `category_ids` with expense totals.
    ///
    /// Every requested category appears in the result, zero if nothing
    /// matched. Uncategorized expenses count towards `total_expense` only.
    pub async fn get_transactions_by_categories(
        &self,
        user_id: &str,
        category_ids: &[String],
    ) -> Result<CategoryExpenseReport, ServiceError> {
        let unique_ids = dedup_preserving_order(category_ids);
        if unique_ids.is_empty() {
            return Err(DomainError::validation("category_ids must not be empty").into());
        }

        let transactions = self
            .repo
            .list_by_user_and_categories(user_id, &unique_ids)
            .await?;

        let mut tally = ExpenseTally::seeded(&unique_ids);
        let mut total_expense = Decimal::ZERO;
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            total_expense = add_expense(total_expense, tx.amount())?;
            if let Some(category_id) = tx.category_id.as_deref() {
                tally.add(Some(category_id), tx.amount())?;
            }
        }

        tracing::debug!(
            event = "TransactionsByCategories",
            user_id,
            categories = unique_ids.len(),
            count = transactions.len(),
            total_expense = %total_expense,
        );

        Ok(CategoryExpenseReport {
            transactions,
            total_expense,
            expense_by_category: tally.into_entries(),
        })
    }

    /// Transactions that occurred within `[start_at, end_at]` with expense
    /// totals keyed by the categories actually seen.
    pub async fn get_transactions_for_period(
        &self,
        user_id: &str,
        start_at: impl Into<Timestamp>,
        end_at: impl Into<Timestamp>,
    ) -> Result<PeriodExpenseReport, ServiceError> {
        let start_at: DateTime<Utc> = start_at.into().to_utc();
        let end_at: DateTime<Utc> = end_at.into().to_utc();
        if start_at > end_at {
            return Err(
                DomainError::validation("start_at must be before or equal to end_at").into(),
            );
        }

        let transactions = self
            .repo
            .list_by_user_and_period(user_id, start_at, end_at)
            .await?;

        let mut tally = ExpenseTally::default();
        let mut total_expense = Decimal::ZERO;
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            total_expense = add_expense(total_expense, tx.amount())?;
            tally.add(tx.category_id.as_deref(), tx.amount())?;
        }

        tracing::debug!(
            event = "TransactionsForPeriod",
            user_id,
            %start_at,
            %end_at,
            count = transactions.len(),
            total_expense = %total_expense,
        );

        Ok(PeriodExpenseReport {
            start_at,
            end_at,
            transactions,
            total_expense,
            expense_by_category: tally.into_entries(),
        })
    }
}

fn dedup_preserving_order(ids: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTransactionRepository;
    use chrono::{NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn service() -> TransactionService<InMemoryTransactionRepository> {
        TransactionService::new(InMemoryTransactionRepository::new())
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    async fn record(
        service: &TransactionService<InMemoryTransactionRepository>,
        user_id: &str,
        tx_type: &str,
        amount: Decimal,
        category: Option<&str>,
        occurred_at: DateTime<Utc>,
    ) -> Transaction {
        let mut cmd = RecordTransactionCommand::new(user_id, tx_type, amount, occurred_at);
        if let Some(category) = category {
            cmd = cmd.with_category(category);
        }
        service.record_transaction(cmd).await.unwrap()
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_record_transaction_success() {
        let service = service();
        let cmd = RecordTransactionCommand::new("u1", "expense", dec!(10.50), at(22, 12))
            .with_category("food")
            .with_description("lunch");

        let tx = service.record_transaction(cmd).await.unwrap();

        assert!(!tx.id.is_empty());
        assert_eq!(tx.user_id, "u1");
        assert_eq!(tx.tx_type, TransactionType::Expense);
        assert_eq!(tx.money.amount(), dec!(10.50));
        assert_eq!(tx.money.currency(), "RUB");
        assert_eq!(service.repository().get(&tx.id).await.unwrap(), Some(tx));
    }

    #[tokio::test]
    async fn test_record_income_success() {
        let service = service();
        let tx = record(&service, "u1", "income", dec!(1000), Some("salary"), at(1, 9)).await;
        assert_eq!(tx.tx_type, TransactionType::Income);
    }

    #[tokio::test]
    async fn test_record_transaction_invalid_amount() {
        let service = service();
        for amount in [Decimal::ZERO, dec!(-5)] {
            let cmd = RecordTransactionCommand::new("u1", "expense", amount, at(22, 12));
            let err = service.record_transaction(cmd).await.unwrap_err();
            assert!(err.is_validation());
        }
        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn test_record_transaction_invalid_currency() {
        let service = service();
        let cmd = RecordTransactionCommand::new("u1", "expense", dec!(1), at(22, 12))
            .with_currency("RUBL");

        let err = service.record_transaction(cmd).await.unwrap_err();
        assert!(err.is_validation());
        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn test_record_transaction_invalid_type() {
        let service = service();
        let cmd = RecordTransactionCommand::new("u1", "transfer", dec!(1), at(22, 12));

        let err = service.record_transaction(cmd).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Unsupported transaction type: transfer");
    }

    #[tokio::test]
    async fn test_record_transaction_requires_user() {
        let service = service();
        let cmd = RecordTransactionCommand::new("", "expense", dec!(1), at(22, 12));

        let err = service.record_transaction(cmd).await.unwrap_err();
        assert_eq!(err.to_string(), "user_id is required");
    }

    #[tokio::test]
    async fn test_record_transaction_normalizes_naive_time_to_utc() {
        let service = service();
        let naive = NaiveDate::from_ymd_opt(2026, 1, 22)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let cmd = RecordTransactionCommand::new("u1", "expense", dec!(1), naive);

        let tx = service.record_transaction(cmd).await.unwrap();
        assert_eq!(tx.occurred_at, at(22, 12));
    }

    #[tokio::test]
    async fn test_get_transaction_not_found() {
        let service = service();
        let err = service.get_transaction("u1", "missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_transaction_foreign_owner_looks_missing() {
        let service = service();
        let tx = record(&service, "owner", "expense", dec!(1), None, at(1, 0)).await;

        let foreign = service.get_transaction("intruder", &tx.id).await.unwrap_err();
        let missing = service.get_transaction("intruder", "missing").await.unwrap_err();

        assert!(foreign.is_not_found());
        assert_eq!(foreign.to_string(), missing.to_string());
        assert_eq!(service.get_transaction("owner", &tx.id).await.unwrap(), tx);
    }

    #[tokio::test]
    async fn test_list_transactions_is_scoped_and_repeatable() {
        let service = service();
        record(&service, "u1", "expense", dec!(1), None, at(1, 0)).await;
        record(&service, "u1", "income", dec!(2), None, at(2, 0)).await;
        record(&service, "u2", "expense", dec!(3), None, at(3, 0)).await;

        let first = service.list_transactions("u1").await.unwrap();
        let second = service.list_transactions("u1").await.unwrap();

        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|tx| tx.user_id == "u1"));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_by_categories_empty_rejected() {
        let service = service();
        let err = service
            .get_transactions_by_categories("u1", &[])
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "category_ids must not be empty");
    }

    #[tokio::test]
    async fn test_by_categories_totals_exclude_income() {
        let service = service();
        record(&service, "u1", "expense", dec!(100), Some("food"), at(10, 10)).await;
        record(&service, "u1", "income", dec!(20), Some("food"), at(11, 10)).await;
        record(&service, "u1", "expense", dec!(40), Some("transport"), at(12, 10)).await;
        record(&service, "u1", "expense", dec!(7), Some("rent"), at(12, 11)).await;

        let report = service
            .get_transactions_by_categories("u1", &ids(&["food", "transport"]))
            .await
            .unwrap();

        assert_eq!(report.transactions.len(), 3);
        assert_eq!(report.total_expense, dec!(140));
        assert_eq!(report.expense_for("food"), Some(dec!(100)));
        assert_eq!(report.expense_for("transport"), Some(dec!(40)));
        assert_eq!(report.expense_for("rent"), None);
    }

    #[tokio::test]
    async fn test_by_categories_seeds_zero_and_dedups_in_order() {
        let service = service();
        record(&service, "u1", "expense", dec!(12.34), Some("food"), at(10, 10)).await;

        let report = service
            .get_transactions_by_categories("u1", &ids(&["travel", "food", "travel"]))
            .await
            .unwrap();

        let keys: Vec<Option<&str>> = report
            .expense_by_category
            .iter()
            .map(|entry| entry.category_id.as_deref())
            .collect();
        assert_eq!(keys, vec![Some("travel"), Some("food")]);
        assert_eq!(report.expense_for("travel"), Some(Decimal::ZERO));
        assert_eq!(report.expense_for("food"), Some(dec!(12.34)));
        assert_eq!(report.total_expense, dec!(12.34));
    }

    #[tokio::test]
    async fn test_by_categories_ignores_other_users() {
        let service = service();
        record(&service, "u2", "expense", dec!(50), Some("food"), at(10, 10)).await;

        let report = service
            .get_transactions_by_categories("u1", &ids(&["food"]))
            .await
            .unwrap();

        assert!(report.transactions.is_empty());
        assert_eq!(report.total_expense, Decimal::ZERO);
        assert_eq!(report.expense_for("food"), Some(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_by_categories_sums_decimals_exactly() {
        let service = service();
        record(&service, "u1", "expense", dec!(0.10), Some("food"), at(1, 0)).await;
        record(&service, "u1", "expense", dec!(0.20), Some("food"), at(2, 0)).await;

        let report = service
            .get_transactions_by_categories("u1", &ids(&["food"]))
            .await
            .unwrap();

        assert_eq!(report.total_expense, dec!(0.30));
        assert_eq!(report.expense_for("food"), Some(dec!(0.30)));
    }

    #[tokio::test]
    async fn test_for_period_invalid_range() {
        let service = service();
        let err = service
            .get_transactions_for_period("u1", at(2, 0), at(1, 0))
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "start_at must be before or equal to end_at");
    }

    #[tokio::test]
    async fn test_for_period_equal_bounds_allowed() {
        let service = service();
        let empty = service
            .get_transactions_for_period("u1", at(5, 0), at(5, 0))
            .await
            .unwrap();
        assert!(empty.transactions.is_empty());
        assert!(empty.expense_by_category.is_empty());

        record(&service, "u1", "expense", dec!(3), None, at(5, 0)).await;
        let hit = service
            .get_transactions_for_period("u1", at(5, 0), at(5, 0))
            .await
            .unwrap();
        assert_eq!(hit.transactions.len(), 1);
        assert_eq!(hit.total_expense, dec!(3));
    }

    #[tokio::test]
    async fn test_for_period_totals_by_seen_categories() {
        let service = service();
        record(&service, "u1", "expense", dec!(100), Some("food"), at(10, 10)).await;
        record(&service, "u1", "expense", dec!(40), Some("transport"), at(11, 10)).await;
        record(&service, "u1", "expense", dec!(15), None, at(12, 10)).await;
        record(&service, "u1", "income", dec!(500), Some("salary"), at(13, 10)).await;
        record(&service, "u1", "expense", dec!(80), Some("food"), at(31, 23)).await;

        let report = service
            .get_transactions_for_period("u1", at(1, 0), at(20, 0))
            .await
            .unwrap();

        assert_eq!(report.transactions.len(), 4);
        assert_eq!(report.total_expense, dec!(155));
        assert_eq!(report.expense_for(Some("food")), Some(dec!(100)));
        assert_eq!(report.expense_for(Some("transport")), Some(dec!(40)));
        assert_eq!(report.expense_for(None), Some(dec!(15)));
        assert_eq!(report.expense_for(Some("salary")), None);
        assert_eq!(report.expense_by_category.len(), 3);
    }

    #[tokio::test]
    async fn test_for_period_orders_newest_occurred_first() {
        let service = service();
        let early = record(&service, "u1", "expense", dec!(1), None, at(3, 0)).await;
        let late = record(&service, "u1", "expense", dec!(1), None, at(9, 0)).await;
        let middle = record(&service, "u1", "expense", dec!(1), None, at(6, 0)).await;

        let report = service
            .get_transactions_for_period("u1", at(1, 0), at(10, 0))
            .await
            .unwrap();

        assert_eq!(report.transactions, vec![late, middle, early]);
    }

    #[tokio::test]
    async fn test_for_period_normalizes_naive_bounds() {
        let service = service();
        record(&service, "u1", "expense", dec!(9), Some("food"), at(15, 12)).await;

        let start: Timestamp = "2026-01-15T00:00:00".parse().unwrap();
        let end: Timestamp = "2026-01-15T23:59:59".parse().unwrap();
        let report = service
            .get_transactions_for_period("u1", start, end)
            .await
            .unwrap();

        assert_eq!(report.start_at, at(15, 0));
        assert_eq!(report.total_expense, dec!(9));
    }

    #[tokio::test]
    async fn test_expense_total_overflow_is_rejected() {
        let service = service();
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        record(&service, "u1", "expense", huge, Some("food"), at(10, 12)).await;
        record(&service, "u1", "expense", huge, Some("food"), at(11, 12)).await;

        let err = service
            .get_transactions_by_categories("u1", &ids(&["food"]))
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .get_transactions_for_period("u1", at(1, 0), at(31, 0))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_dedup_preserving_order() {
        assert_eq!(
            dedup_preserving_order(&ids(&["b", "a", "b", "c", "a"])),
            ids(&["b", "a", "c"])
        );
        assert!(dedup_preserving_order(&[]).is_empty());
    }
}
