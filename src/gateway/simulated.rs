//! Simulated gateway
//!
//! In-process stand-in for a card processor. Approves payments up to a
//! configured ceiling, remembers what it charged and refunds at most that
//! much per transaction.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{format_money, is_valid_patron_id};

use super::{GatewayError, PaymentGateway, PaymentReceipt, RefundReceipt, TRANSACTION_ID_PREFIX};

#[derive(Debug, Clone)]
struct Charge {
    amount: Decimal,
    refunded: Decimal,
}

#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    decline_above: Decimal,
    charges: Arc<Mutex<HashMap<String, Charge>>>,
}

impl SimulatedGateway {
    /// Payments larger than `decline_above` are declined.
    pub fn new(decline_above: Decimal) -> Self {
        Self {
            decline_above,
            charges: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn next_transaction_id(patron_id: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}{}_{}", TRANSACTION_ID_PREFIX, patron_id, &suffix[..12])
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentReceipt, GatewayError> {
        if amount <= Decimal::ZERO {
            return Ok(PaymentReceipt::declined("Invalid amount: must be greater than 0"));
        }
        if amount > self.decline_above {
            return Ok(PaymentReceipt::declined("Payment declined: amount exceeds limit"));
        }
        if !is_valid_patron_id(patron_id) {
            return Ok(PaymentReceipt::declined("Invalid patron ID format"));
        }

        let transaction_id = Self::next_transaction_id(patron_id);
        self.charges.lock().await.insert(
            transaction_id.clone(),
            Charge {
                amount,
                refunded: Decimal::ZERO,
            },
        );

        tracing::debug!(%transaction_id, %amount, description, "Simulated charge approved");
        Ok(PaymentReceipt::approved(
            transaction_id,
            format!("Payment of {} processed successfully", format_money(amount)),
        ))
    }

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundReceipt, GatewayError> {
        if !transaction_id.starts_with(TRANSACTION_ID_PREFIX) {
            return Ok(RefundReceipt::declined("Invalid transaction ID"));
        }
        if amount <= Decimal::ZERO {
            return Ok(RefundReceipt::declined("Invalid refund amount"));
        }

        let mut charges = self.charges.lock().await;
        let charge = match charges.get_mut(transaction_id) {
            Some(charge) => charge,
            None => return Ok(RefundReceipt::declined("Transaction not found")),
        };

        if charge.refunded + amount > charge.amount {
            return Ok(RefundReceipt::declined("Refund exceeds the original payment"));
        }
        charge.refunded += amount;

        Ok(RefundReceipt::approved(format!(
            "Refund of {} processed successfully. Refund ID: refund_{}",
            format_money(amount),
            &transaction_id[TRANSACTION_ID_PREFIX.len()..]
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_payment_then_refund() {
        let gateway = SimulatedGateway::new(dec!(1000));
        let receipt = gateway
            .process_payment("123456", dec!(6.50), "Late fees for 'Dune'")
            .await
            .unwrap();
        assert!(receipt.success);
        assert!(receipt.transaction_id.starts_with("txn_123456_"));
        assert!(receipt.message.contains("$6.50"));

        let refund = gateway.refund_payment(&receipt.transaction_id, dec!(4.00)).await.unwrap();
        assert!(refund.success);
        assert!(refund.message.contains("$4.00"));

        let over = gateway.refund_payment(&receipt.transaction_id, dec!(3.00)).await.unwrap();
        assert!(!over.success);
    }

    #[tokio::test]
    async fn test_declines() {
        let gateway = SimulatedGateway::new(dec!(10));
        assert!(!gateway.process_payment("123456", dec!(0), "x").await.unwrap().success);
        assert!(!gateway.process_payment("123456", dec!(10.01), "x").await.unwrap().success);
        assert!(!gateway.process_payment("12345", dec!(1), "x").await.unwrap().success);

        assert!(!gateway.refund_payment("tx_1", dec!(1)).await.unwrap().success);
        assert!(!gateway.refund_payment("txn_unknown", dec!(1)).await.unwrap().success);
    }
}
