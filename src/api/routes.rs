//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, DomainError, FeeQuote, OperationContext, SearchType};
use crate::error::AppError;
use crate::handlers::{
    AddBookCommand, BorrowCommand, BorrowHandler, CatalogHandler, LateFeeCalculator,
    PatronStatus, PaymentOutcome, RefundOutcome, ReturnCommand, ReturnHandler, SettlementError,
    SettlementHandler, StatusHandler,
};

use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
}

#[derive(Debug, Serialize)]
pub struct AddBookResponse {
    pub success: bool,
    pub message: String,
    pub book: Book,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_search_type", rename = "type")]
    pub search_type: String,
}

fn default_search_type() -> String {
    "title".to_string()
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub search_term: String,
    pub search_type: SearchType,
    pub results: Vec<Book>,
}

/// Body of `/borrow` and `/return`
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanRequest {
    pub patron_id: String,
    pub book_id: i64,
}

#[derive(Debug, Serialize)]
pub struct BorrowResponse {
    pub success: bool,
    pub message: String,
    pub record_id: i64,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub success: bool,
    pub message: String,
    pub return_date: DateTime<Utc>,
    pub late_fee: FeeQuote,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayLateFeesRequest {
    pub patron_id: String,
    pub book_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefundRequest {
    pub transaction_id: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SettlementResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

impl From<PaymentOutcome> for SettlementResponse {
    fn from(outcome: PaymentOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            transaction_id: outcome.transaction_id,
            error_code: outcome.error.as_ref().map(SettlementError::error_code),
        }
    }
}

impl From<RefundOutcome> for SettlementResponse {
    fn from(outcome: RefundOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
            transaction_id: None,
            error_code: outcome.error.as_ref().map(SettlementError::error_code),
        }
    }
}

fn settlement_status(error: Option<&SettlementError>) -> StatusCode {
    match error {
        None => StatusCode::OK,
        Some(
            SettlementError::InvalidPatron
            | SettlementError::InvalidTransactionId
            | SettlementError::InvalidAmount
            | SettlementError::ExceedsMaximum,
        ) => StatusCode::BAD_REQUEST,
        Some(SettlementError::BookNotFound) => StatusCode::NOT_FOUND,
        Some(SettlementError::NoFeesOwed) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(SettlementError::CalculationError) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(SettlementError::PaymentDeclined(_) | SettlementError::RefundDeclined(_)) => {
            StatusCode::PAYMENT_REQUIRED
        }
        Some(SettlementError::PaymentProcessing(_) | SettlementError::RefundProcessing(_)) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/books", get(list_books).post(add_book))
        .route("/books/:book_id", get(get_book))
        .route("/search", get(search_books))
        // Loans
        .route("/borrow", post(borrow_book))
        .route("/return", post(return_book))
        // Patrons
        .route("/patrons/:patron_id/status", get(patron_status))
        .route("/late-fees/:patron_id/:book_id", get(late_fee))
        // Settlement
        .route("/payments/late-fees", post(pay_late_fees))
        .route("/payments/refunds", post(refund_late_fee_payment))
}

// =========================================================================
// Catalog
// =========================================================================

async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = CatalogHandler::new(state.store).list_books().await?;
    Ok(Json(books))
}

async fn add_book(
    State(state): State<AppState>,
    Json(request): Json<AddBookRequest>,
) -> Result<(StatusCode, Json<AddBookResponse>), AppError> {
    let command = AddBookCommand::new(
        request.title,
        request.author,
        request.isbn,
        request.total_copies,
    );
    let result = CatalogHandler::new(state.store).add_book(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(AddBookResponse {
            success: true,
            message: result.message,
            book: result.book,
        }),
    ))
}

async fn get_book(
    State(state): State<AppState>,
    Path(book_id): Path<i64>,
) -> Result<Json<Book>, AppError> {
    let book = CatalogHandler::new(state.store).get_book(book_id).await?;
    Ok(Json(book))
}

async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let search_type = SearchType::from(query.search_type.as_str());
    let results = CatalogHandler::new(state.store)
        .search(&query.q, search_type)
        .await?;

    Ok(Json(SearchResponse {
        search_term: query.q,
        search_type,
        results,
    }))
}

// =========================================================================
// Loans
// =========================================================================

async fn borrow_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<BorrowResponse>, AppError> {
    tracing::debug!(correlation_id = ?context.correlation_id, "Borrow requested");

    let handler = BorrowHandler::new(state.store, state.clock);
    let result = handler
        .execute(BorrowCommand::new(request.patron_id, request.book_id))
        .await?;

    Ok(Json(BorrowResponse {
        success: true,
        message: result.message,
        record_id: result.record.id,
        due_date: result.record.due_date,
    }))
}

async fn return_book(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<LoanRequest>,
) -> Result<Json<ReturnResponse>, AppError> {
    tracing::debug!(correlation_id = ?context.correlation_id, "Return requested");

    let handler = ReturnHandler::new(state.store, state.clock);
    let result = handler
        .execute(ReturnCommand::new(request.patron_id, request.book_id))
        .await?;

    Ok(Json(ReturnResponse {
        success: true,
        message: result.message,
        return_date: result.return_date,
        late_fee: result.late_fee,
    }))
}

// =========================================================================
// Patrons
// =========================================================================

async fn patron_status(
    State(state): State<AppState>,
    Path(patron_id): Path<String>,
) -> Result<Json<PatronStatus>, AppError> {
    let status = StatusHandler::new(state.store, state.clock)
        .execute(&patron_id)
        .await?
        .ok_or(DomainError::InvalidPatron)?;
    Ok(Json(status))
}

async fn late_fee(
    State(state): State<AppState>,
    Path((patron_id, book_id)): Path<(String, i64)>,
) -> Result<Json<FeeQuote>, AppError> {
    let quote = LateFeeCalculator::new(state.store, state.clock)
        .calculate(&patron_id, book_id)
        .await
        .map_err(AppError::database("calculating late fees"))?;
    Ok(Json(quote))
}

// =========================================================================
// Settlement
// =========================================================================

async fn pay_late_fees(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<PayLateFeesRequest>,
) -> (StatusCode, Json<SettlementResponse>) {
    tracing::debug!(correlation_id = ?context.correlation_id, "Late fee payment requested");

    let outcome = SettlementHandler::new(state.store, state.clock)
        .pay_late_fees(&request.patron_id, request.book_id, state.gateway.as_ref())
        .await;

    (settlement_status(outcome.error.as_ref()), Json(outcome.into()))
}

async fn refund_late_fee_payment(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<RefundRequest>,
) -> (StatusCode, Json<SettlementResponse>) {
    tracing::debug!(correlation_id = ?context.correlation_id, "Refund requested");

    let outcome = SettlementHandler::new(state.store, state.clock)
        .refund_late_fee_payment(&request.transaction_id, request.amount, state.gateway.as_ref())
        .await;

    (settlement_status(outcome.error.as_ref()), Json(outcome.into()))
}
