//! Borrow Handler
//!
//! Lends one copy of a book to a patron.

use std::sync::Arc;

use crate::domain::{loan::due_date_for, Clock, DomainError, PatronId, MAX_ACTIVE_LOANS};
use crate::error::AppError;
use crate::store::LibraryStore;

use super::{BorrowCommand, BorrowResult};

/// Handler for borrowing books
pub struct BorrowHandler {
    store: Arc<dyn LibraryStore>,
    clock: Arc<dyn Clock>,
}

impl BorrowHandler {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Execute the borrow command.
    ///
    /// The record insert and the availability update are separate store
    /// calls. If the update fails the record stays in place.
    pub async fn execute(&self, command: BorrowCommand) -> Result<BorrowResult, AppError> {
        let patron_id = PatronId::parse(&command.patron_id)?;

        let book = self
            .store
            .get_book_by_id(command.book_id)
            .await
            .map_err(AppError::database("loading the book"))?
            .ok_or(DomainError::BookNotFound)?;

        if !book.is_available() {
            return Err(DomainError::Unavailable.into());
        }

        let active_loans = self
            .store
            .get_patron_borrow_count(patron_id.as_str())
            .await
            .map_err(AppError::database("counting active loans"))?;

        if active_loans > MAX_ACTIVE_LOANS {
            tracing::warn!(patron_id = %patron_id, active_loans, "Borrowing limit reached");
            return Err(DomainError::LimitExceeded.into());
        }

        let borrow_date = self.clock.now();
        let due_date = due_date_for(borrow_date);

        let record = self
            .store
            .insert_borrow_record(patron_id.as_str(), book.id, borrow_date, due_date)
            .await
            .map_err(AppError::database("creating borrow record"))?;

        self.store
            .update_book_availability(book.id, -1)
            .await
            .map_err(AppError::database("updating book availability"))?;

        tracing::info!(
            patron_id = %patron_id,
            book_id = book.id,
            record_id = record.id,
            due_date = %due_date.format("%Y-%m-%d"),
            "Book borrowed"
        );

        let message = format!(
            "Successfully borrowed \"{}\". Due date: {}.",
            book.title,
            due_date.format("%Y-%m-%d")
        );
        Ok(BorrowResult { record, message })
    }
}
