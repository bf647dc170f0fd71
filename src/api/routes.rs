//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::{Timestamp, Transaction, TransactionType, DEFAULT_CURRENCY};
use crate::error::{AppError, AppResult};
use crate::service::{CategoryExpense, RecordTransactionCommand, TransactionService};
use crate::store::TransactionRepository;

// =========================================================================
// Application state
// =========================================================================

/// Shared state for every handler
#[derive(Debug, Clone)]
pub struct AppState<R> {
    pub service: TransactionService<R>,
    /// Owner of all requests until authentication exists
    pub user_id: Arc<str>,
}

impl<R: TransactionRepository> AppState<R> {
    pub fn new(repo: R, user_id: impl Into<Arc<str>>) -> Self {
        Self {
            service: TransactionService::new(repo),
            user_id: user_id.into(),
        }
    }
}

// =========================================================================
// Request/Response types
// =========================================================================

/// Amount as sent by clients: a decimal string or a JSON number.
///
/// Numbers keep their literal digits (serde_json `arbitrary_precision`) and
/// are parsed straight into a `Decimal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Text(String),
    Number(serde_json::Number),
}

impl AmountField {
    fn to_decimal(&self) -> AppResult<Decimal> {
        let raw = match self {
            AmountField::Text(text) => text.trim().to_string(),
            AmountField::Number(number) => number.to_string(),
        };

        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| AppError::InvalidRequest(format!("Invalid amount: {}", raw)))
    }
}

impl From<&str> for AmountField {
    fn from(value: &str) -> Self {
        AmountField::Text(value.to_string())
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: AmountField,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub occurred_at: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: Decimal,
    pub currency: String,
    pub occurred_at: DateTime<Utc>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            amount: tx.money.amount(),
            currency: tx.money.currency().to_string(),
            id: tx.id,
            user_id: tx.user_id,
            tx_type: tx.tx_type,
            occurred_at: tx.occurred_at,
            category_id: tx.category_id,
            account_id: tx.account_id,
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryExpenseResponse {
    pub category_id: Option<String>,
    pub total_expense: Decimal,
}

impl From<CategoryExpense> for CategoryExpenseResponse {
    fn from(entry: CategoryExpense) -> Self {
        Self {
            category_id: entry.category_id,
            total_expense: entry.total_expense,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsByCategoriesResponse {
    pub transactions: Vec<TransactionResponse>,
    pub total_expense: Decimal,
    pub expense_by_category: Vec<CategoryExpenseResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsPeriodStatsResponse {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub transactions: Vec<TransactionResponse>,
    pub total_expense: Decimal,
    pub expense_by_category: Vec<CategoryExpenseResponse>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub start_at: String,
    pub end_at: String,
}

fn to_responses<I, T, U>(items: I) -> Vec<U>
where
    I: IntoIterator<Item = T>,
    U: From<T>,
{
    items.into_iter().map(U::from).collect()
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router<R: TransactionRepository>() -> Router<AppState<R>> {
    Router::new()
        .route(
            "/transactions",
            post(create_transaction::<R>).get(list_transactions::<R>),
        )
        .route(
            "/transactions/by-categories",
            get(list_transactions_by_categories::<R>),
        )
        .route("/transactions/by-period", get(list_transactions_by_period::<R>))
        .route("/transactions/:transaction_id", get(get_transaction::<R>))
}

// =========================================================================
// POST /transactions
// =========================================================================

/// Record an expense or income
async fn create_transaction<R: TransactionRepository>(
    State(state): State<AppState<R>>,
    Json(request): Json<CreateTransactionRequest>,
) -> AppResult<(StatusCode, Json<TransactionResponse>)> {
    let amount = request.amount.to_decimal()?;
    let occurred_at: Timestamp = request.occurred_at.parse()?;

    let mut command = RecordTransactionCommand::new(
        state.user_id.as_ref(),
        request.tx_type,
        amount,
        occurred_at,
    )
    .with_currency(request.currency);
    command.category_id = request.category_id;
    command.account_id = request.account_id;
    command.description = request.description;

    let tx = state.service.record_transaction(command).await?;

    Ok((StatusCode::CREATED, Json(tx.into())))
}

// =========================================================================
// GET /transactions
// =========================================================================

/// List the user's transactions, newest first
async fn list_transactions<R: TransactionRepository>(
    State(state): State<AppState<R>>,
) -> AppResult<Json<Vec<TransactionResponse>>> {
    let transactions = state.service.list_transactions(&state.user_id).await?;

    Ok(Json(to_responses(transactions)))
}

// =========================================================================
// GET /transactions/by-categories?category_ids=a&category_ids=b
// =========================================================================

/// Transactions in the requested categories with expense totals
async fn list_transactions_by_categories<R: TransactionRepository>(
    State(state): State<AppState<R>>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<TransactionsByCategoriesResponse>> {
    let category_ids: Vec<String> = params
        .into_iter()
        .filter(|(key, _)| key == "category_ids")
        .map(|(_, value)| value)
        .collect();

    let report = state
        .service
        .get_transactions_by_categories(&state.user_id, &category_ids)
        .await?;

    Ok(Json(TransactionsByCategoriesResponse {
        transactions: to_responses(report.transactions),
        total_expense: report.total_expense,
        expense_by_category: to_responses(report.expense_by_category),
    }))
}

// =========================================================================
// GET /transactions/by-period?start_at=..&end_at=..
// =========================================================================

/// Transactions within an inclusive time window with expense totals
async fn list_transactions_by_period<R: TransactionRepository>(
    State(state): State<AppState<R>>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> AppResult<Json<TransactionsPeriodStatsResponse>> {
    let Query(query) =
        query.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    let start_at: Timestamp = query.start_at.parse()?;
    let end_at: Timestamp = query.end_at.parse()?;

    let report = state
        .service
        .get_transactions_for_period(&state.user_id, start_at, end_at)
        .await?;

    Ok(Json(TransactionsPeriodStatsResponse {
        start_at: report.start_at,
        end_at: report.end_at,
        transactions: to_responses(report.transactions),
        total_expense: report.total_expense,
        expense_by_category: to_responses(report.expense_by_category),
    }))
}

// =========================================================================
// GET /transactions/:transaction_id
// =========================================================================

/// Get one of the user's transactions
async fn get_transaction<R: TransactionRepository>(
    State(state): State<AppState<R>>,
    Path(transaction_id): Path<String>,
) -> AppResult<Json<TransactionResponse>> {
    let tx = state
        .service
        .get_transaction(&state.user_id, &transaction_id)
        .await?;

    Ok(Json(tx.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_deserialize_defaults() {
        let json = r#"{
            "type": "expense",
            "amount": "100.50",
            "occurred_at": "2026-01-10T10:00:00Z"
        }"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.tx_type, "expense");
        assert_eq!(request.currency, "RUB");
        assert_eq!(request.amount.to_decimal().unwrap(), dec!(100.50));
        assert!(request.category_id.is_none());
        assert!(request.description.is_none());
    }

    #[test]
    fn test_amount_accepts_json_number() {
        let json = r#"{
            "type": "income",
            "amount": 20.25,
            "currency": "USD",
            "occurred_at": "2026-01-10T10:00:00Z",
            "category_id": "salary"
        }"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount.to_decimal().unwrap(), dec!(20.25));
        assert_eq!(request.category_id.as_deref(), Some("salary"));
    }

    #[test]
    fn test_amount_number_keeps_every_digit() {
        let json = r#"{
            "type": "expense",
            "amount": 12345678901234567.89,
            "occurred_at": "2026-01-10T10:00:00Z"
        }"#;

        let request: CreateTransactionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.amount.to_decimal().unwrap(),
            dec!(12345678901234567.89)
        );
    }

    #[test]
    fn test_amount_rejects_garbage() {
        let err = AmountField::from("ten").to_decimal().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_category_expense_serializes_decimal_as_string() {
        let response = CategoryExpenseResponse {
            category_id: None,
            total_expense: dec!(140.00),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["category_id"], serde_json::Value::Null);
        assert_eq!(json["total_expense"], "140.00");
    }
}
