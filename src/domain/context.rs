//! Operation Context
//!
//! Request metadata carried through handlers for tracing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an operation, used to correlate log lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationContext {
    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    /// Generate a new correlation ID if not present
    pub fn ensure_correlation_id(&mut self) -> Uuid {
        *self.correlation_id.get_or_insert_with(Uuid::new_v4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let correlation_id = Uuid::new_v4();
        let context = OperationContext::new().with_correlation_id(correlation_id);

        assert_eq!(context.correlation_id, Some(correlation_id));
    }

    #[test]
    fn test_ensure_correlation_id() {
        let mut context = OperationContext::new();
        assert!(context.correlation_id.is_none());

        let id = context.ensure_correlation_id();
        assert_eq!(context.correlation_id, Some(id));
        assert_eq!(context.ensure_correlation_id(), id);
    }
}
