//! Patron Status Handler

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{is_valid_patron_id, Clock};
use crate::error::AppError;
use crate::store::LibraryStore;

use super::{LateFeeCalculator, PatronStatus};

/// Builds the patron status report
pub struct StatusHandler {
    store: Arc<dyn LibraryStore>,
    late_fees: LateFeeCalculator,
}

impl StatusHandler {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            late_fees: LateFeeCalculator::new(store.clone(), clock),
            store,
        }
    }

    /// `None` when the patron id is malformed
    pub async fn execute(&self, patron_id: &str) -> Result<Option<PatronStatus>, AppError> {
        if !is_valid_patron_id(patron_id) {
            return Ok(None);
        }

        let books = self
            .store
            .get_patron_borrowed_books(patron_id)
            .await
            .map_err(AppError::database("loading active loans"))?;

        let mut total_late_fees = Decimal::ZERO;
        for loan in &books {
            let quote = self
                .late_fees
                .calculate(patron_id, loan.book_id)
                .await
                .map_err(AppError::database("calculating late fees"))?;
            total_late_fees += quote.fee_amount;
        }

        let borrowing_history = self
            .store
            .get_patron_borrow_history(patron_id)
            .await
            .map_err(AppError::database("loading borrowing history"))?;

        Ok(Some(PatronStatus {
            patron_id: patron_id.to_string(),
            num_books_borrowed: books.len(),
            books,
            total_late_fees,
            borrowing_history,
        }))
    }
}
