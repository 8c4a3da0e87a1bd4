//! Payment gateway
//!
//! The third-party processor that collects and refunds late fees. Settlement
//! receives it as a `&dyn PaymentGateway`, so any conforming implementation
//! (or a test double) can be supplied.

mod simulated;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use simulated::SimulatedGateway;

/// Prefix carried by every transaction id the gateway issues
pub const TRANSACTION_ID_PREFIX: &str = "txn_";

/// Answer to a payment request that reached the processor.
///
/// A declined payment is still `Ok`: `success` is false and `message` says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub success: bool,
    pub transaction_id: String,
    pub message: String,
}

impl PaymentReceipt {
    pub fn approved(transaction_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            transaction_id: transaction_id.into(),
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: String::new(),
            message: message.into(),
        }
    }
}

/// Answer to a refund request that reached the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundReceipt {
    pub success: bool,
    pub message: String,
}

impl RefundReceipt {
    pub fn approved(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// The request never got a definite answer from the processor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway timed out")]
    Timeout,
}

/// Payment processor capability
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process_payment(
        &self,
        patron_id: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<PaymentReceipt, GatewayError>;

    async fn refund_payment(
        &self,
        transaction_id: &str,
        amount: Decimal,
    ) -> Result<RefundReceipt, GatewayError>;
}
