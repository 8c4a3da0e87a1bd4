//! Return Handler
//!
//! Closes a patron's loan, puts the copy back on the shelf and reports the
//! late fee owed at the moment of return.

use std::sync::Arc;

use crate::domain::{format_money, Clock, DomainError, PatronId};
use crate::error::AppError;
use crate::store::LibraryStore;

use super::{LateFeeCalculator, ReturnCommand, ReturnResult};

/// Handler for returning books
pub struct ReturnHandler {
    store: Arc<dyn LibraryStore>,
    clock: Arc<dyn Clock>,
    late_fees: LateFeeCalculator,
}

impl ReturnHandler {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            late_fees: LateFeeCalculator::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    /// Execute the return command
    pub async fn execute(&self, command: ReturnCommand) -> Result<ReturnResult, AppError> {
        let patron_id = PatronId::parse(&command.patron_id)?;

        let book = self
            .store
            .get_book_by_id(command.book_id)
            .await
            .map_err(AppError::database("loading the book"))?
            .ok_or(DomainError::BookNotFound)?;

        let has_loan = self
            .store
            .get_patron_borrowed_books(patron_id.as_str())
            .await
            .map_err(AppError::database("loading active loans"))?
            .iter()
            .any(|loan| loan.book_id == book.id);

        if !has_loan {
            return Err(DomainError::NotBorrowed.into());
        }

        // Quote before the record is closed; a returned loan no longer accrues.
        let late_fee = self
            .late_fees
            .calculate(patron_id.as_str(), book.id)
            .await
            .map_err(AppError::database("calculating late fees"))?;

        let return_date = self.clock.now();

        self.store
            .update_borrow_record_return_date(patron_id.as_str(), book.id, return_date)
            .await
            .map_err(AppError::database("updating the return date"))?;

        self.store
            .update_book_availability(book.id, 1)
            .await
            .map_err(AppError::database("updating book availability"))?;

        tracing::info!(
            patron_id = %patron_id,
            book_id = book.id,
            fee = %late_fee.fee_amount,
            days_overdue = late_fee.days_overdue,
            "Book returned"
        );

        let message = format!(
            "Successfully returned \"{}\" on {}. Late fees: {}.",
            book.title,
            return_date.format("%Y-%m-%d"),
            format_money(late_fee.fee_amount)
        );
        Ok(ReturnResult {
            book_id: book.id,
            return_date,
            late_fee,
            message,
        })
    }
}
