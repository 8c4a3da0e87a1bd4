//! Late Fee Calculator
//!
//! Looks up a patron's active loan for a book and quotes the fee owed on it
//! at the current clock time.

use std::sync::Arc;

use crate::domain::{is_valid_patron_id, Clock, FeeQuote};
use crate::store::{LibraryStore, StoreResult};

/// Quotes late fees against the store
#[derive(Clone)]
pub struct LateFeeCalculator {
    store: Arc<dyn LibraryStore>,
    clock: Arc<dyn Clock>,
}

impl LateFeeCalculator {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Fee owed on the patron's active loan of `book_id`.
    ///
    /// A malformed patron id or a book the patron does not have out yields
    /// [`FeeQuote::zero`]. Only a failed store lookup is an error.
    pub async fn calculate(&self, patron_id: &str, book_id: i64) -> StoreResult<FeeQuote> {
        if !is_valid_patron_id(patron_id) {
            return Ok(FeeQuote::zero());
        }

        let loans = self.store.get_patron_borrowed_books(patron_id).await?;
        let quote = loans
            .iter()
            .filter(|loan| loan.book_id == book_id)
            .min_by_key(|loan| loan.record_id)
            .map(|loan| FeeQuote::for_due_date(loan.due_date, self.clock.now()))
            .unwrap_or_default();

        tracing::debug!(
            patron_id,
            book_id,
            fee = %quote.fee_amount,
            days_overdue = quote.days_overdue,
            "Late fee quoted"
        );
        Ok(quote)
    }
}
