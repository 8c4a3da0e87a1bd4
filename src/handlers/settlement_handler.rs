//! Settlement Handler
//!
//! Collects late fees and refunds them through a payment gateway. Every
//! precondition is checked before the gateway is contacted, and whatever the
//! gateway answers is normalized into a [`PaymentOutcome`] or
//! [`RefundOutcome`]. Nothing here returns `Err`.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::{format_money, is_valid_patron_id, Clock, MAX_LATE_FEE};
use crate::gateway::PaymentGateway;
use crate::store::LibraryStore;

use super::{
    LateFeeCalculator, PaymentOutcome, RefundCommand, RefundOutcome, SettlementError,
};

/// Handler for late-fee payments and refunds
pub struct SettlementHandler {
    store: Arc<dyn LibraryStore>,
    late_fees: LateFeeCalculator,
}

impl SettlementHandler {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            late_fees: LateFeeCalculator::new(store.clone(), clock),
            store,
        }
    }

    /// Charge the patron the late fee currently owed on `book_id`.
    pub async fn pay_late_fees(
        &self,
        patron_id: &str,
        book_id: i64,
        gateway: &dyn PaymentGateway,
    ) -> PaymentOutcome {
        if !is_valid_patron_id(patron_id) {
            return PaymentOutcome::failed(SettlementError::InvalidPatron);
        }

        let quote = match self.late_fees.calculate(patron_id, book_id).await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::error!(patron_id, book_id, error = %e, "Late fee lookup failed");
                return PaymentOutcome::failed(SettlementError::CalculationError);
            }
        };

        if !quote.is_owed() {
            return PaymentOutcome::failed(SettlementError::NoFeesOwed);
        }

        let book = match self.store.get_book_by_id(book_id).await {
            Ok(Some(book)) => book,
            Ok(None) => return PaymentOutcome::failed(SettlementError::BookNotFound),
            Err(e) => {
                tracing::error!(book_id, error = %e, "Book lookup failed");
                return PaymentOutcome::failed(SettlementError::BookNotFound);
            }
        };

        let description = format!("Late fees for '{}'", book.title);
        tracing::info!(
            patron_id,
            book_id,
            amount = %quote.fee_amount,
            "Submitting late fee payment"
        );

        match gateway
            .process_payment(patron_id, quote.fee_amount, &description)
            .await
        {
            Ok(receipt) if receipt.success => {
                tracing::info!(
                    patron_id,
                    transaction_id = %receipt.transaction_id,
                    "Late fee payment approved"
                );
                PaymentOutcome::paid(
                    receipt.transaction_id,
                    format!("Payment successful! {}", receipt.message),
                )
            }
            Ok(receipt) => {
                tracing::warn!(patron_id, reason = %receipt.message, "Late fee payment declined");
                PaymentOutcome::failed(SettlementError::PaymentDeclined(receipt.message))
            }
            Err(e) => {
                tracing::error!(patron_id, error = %e, "Payment gateway error");
                PaymentOutcome::failed(SettlementError::PaymentProcessing(e.to_string()))
            }
        }
    }

    /// Refund up to one maximum late fee against an earlier payment.
    pub async fn refund_late_fee_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
        gateway: &dyn PaymentGateway,
    ) -> RefundOutcome {
        let command = RefundCommand::new(transaction_id, amount);

        if !command.has_valid_transaction_id() {
            return RefundOutcome::failed(SettlementError::InvalidTransactionId);
        }
        if command.amount <= Decimal::ZERO {
            return RefundOutcome::failed(SettlementError::InvalidAmount);
        }
        if command.amount > MAX_LATE_FEE {
            return RefundOutcome::failed(SettlementError::ExceedsMaximum);
        }

        tracing::info!(
            transaction_id,
            amount = %format_money(command.amount),
            "Submitting late fee refund"
        );

        match gateway
            .refund_payment(&command.transaction_id, command.amount)
            .await
        {
            Ok(receipt) if receipt.success => {
                tracing::info!(transaction_id, "Refund approved");
                RefundOutcome::refunded(receipt.message)
            }
            Ok(receipt) => {
                tracing::warn!(transaction_id, reason = %receipt.message, "Refund declined");
                RefundOutcome::failed(SettlementError::RefundDeclined(receipt.message))
            }
            Err(e) => {
                tracing::error!(transaction_id, error = %e, "Payment gateway error");
                RefundOutcome::failed(SettlementError::RefundProcessing(e.to_string()))
            }
        }
    }
}
