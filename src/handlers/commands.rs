//! Command definitions
//!
//! Commands carry a patron's intent into a handler; results carry back what
//! changed and the message shown to the patron.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{ActiveLoan, Book, BorrowRecord, FeeQuote};
use crate::gateway::TRANSACTION_ID_PREFIX;

// =========================================================================
// AddBookCommand
// =========================================================================

/// Command to add a title to the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookCommand {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: i32,
}

impl AddBookCommand {
    pub fn new(title: String, author: String, isbn: String, total_copies: i32) -> Self {
        Self {
            title,
            author,
            isbn,
            total_copies,
        }
    }
}

/// Result of a catalog addition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBookResult {
    pub book: Book,
    pub message: String,
}

// =========================================================================
// BorrowCommand / ReturnCommand
// =========================================================================

/// Command to borrow one copy of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowCommand {
    pub patron_id: String,
    pub book_id: i64,
}

impl BorrowCommand {
    pub fn new(patron_id: impl Into<String>, book_id: i64) -> Self {
        Self {
            patron_id: patron_id.into(),
            book_id,
        }
    }
}

/// Result of a successful borrow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowResult {
    pub record: BorrowRecord,
    pub message: String,
}

/// Command to return a borrowed copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnCommand {
    pub patron_id: String,
    pub book_id: i64,
}

impl ReturnCommand {
    pub fn new(patron_id: impl Into<String>, book_id: i64) -> Self {
        Self {
            patron_id: patron_id.into(),
            book_id,
        }
    }
}

/// Result of a successful return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnResult {
    pub book_id: i64,
    pub return_date: DateTime<Utc>,
    pub late_fee: FeeQuote,
    pub message: String,
}

// =========================================================================
// PatronStatus
// =========================================================================

/// Everything a patron has out, owes and has returned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatronStatus {
    pub patron_id: String,
    pub books: Vec<ActiveLoan>,
    pub total_late_fees: Decimal,
    pub num_books_borrowed: usize,
    pub borrowing_history: Vec<BorrowRecord>,
}

// =========================================================================
// Settlement
// =========================================================================

/// Command to refund part or all of an earlier late-fee payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundCommand {
    pub transaction_id: String,
    pub amount: Decimal,
}

impl RefundCommand {
    pub fn new(transaction_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            amount,
        }
    }

    /// Whether the id carries the gateway's transaction prefix
    pub fn has_valid_transaction_id(&self) -> bool {
        self.transaction_id.starts_with(TRANSACTION_ID_PREFIX)
    }
}

/// Why a payment or refund did not go through
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error("Invalid patron ID. Must be exactly 6 digits.")]
    InvalidPatron,

    #[error("Unable to calculate late fees.")]
    CalculationError,

    #[error("No late fees to pay for this book.")]
    NoFeesOwed,

    #[error("Book not found.")]
    BookNotFound,

    /// Gateway answered and declined; carries its message
    #[error("{0}")]
    PaymentDeclined(String),

    #[error("Payment processing error: {0}")]
    PaymentProcessing(String),

    #[error("Invalid transaction ID.")]
    InvalidTransactionId,

    #[error("Refund amount must be greater than 0.")]
    InvalidAmount,

    #[error("Refund amount exceeds maximum late fee.")]
    ExceedsMaximum,

    #[error("{0}")]
    RefundDeclined(String),

    #[error("Refund processing error: {0}")]
    RefundProcessing(String),
}

impl SettlementError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPatron => "invalid_patron",
            Self::CalculationError => "calculation_error",
            Self::NoFeesOwed => "no_fees_owed",
            Self::BookNotFound => "book_not_found",
            Self::PaymentDeclined(_) => "payment_declined",
            Self::PaymentProcessing(_) => "payment_processing_error",
            Self::InvalidTransactionId => "invalid_transaction_id",
            Self::InvalidAmount => "invalid_amount",
            Self::ExceedsMaximum => "exceeds_maximum",
            Self::RefundDeclined(_) => "refund_declined",
            Self::RefundProcessing(_) => "refund_processing_error",
        }
    }
}

/// Normalized result of a late-fee payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentOutcome {
    pub success: bool,
    pub message: String,
    pub transaction_id: Option<String>,
    #[serde(skip)]
    pub error: Option<SettlementError>,
}

impl PaymentOutcome {
    pub fn paid(transaction_id: String, message: String) -> Self {
        Self {
            success: true,
            message,
            transaction_id: Some(transaction_id),
            error: None,
        }
    }

    pub fn failed(error: SettlementError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            transaction_id: None,
            error: Some(error),
        }
    }
}

/// Normalized result of a refund
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefundOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip)]
    pub error: Option<SettlementError>,
}

impl RefundOutcome {
    pub fn refunded(message: String) -> Self {
        Self {
            success: true,
            message,
            error: None,
        }
    }

    pub fn failed(error: SettlementError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            error: Some(error),
        }
    }
}
