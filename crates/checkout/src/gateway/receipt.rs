//! Notification gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Order;

use crate::error::GatewayError;

/// Trait for receipt dispatch. Invoked fire-and-forget from the saga's
/// fulfillment fan-out; a failure is logged, never surfaced.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Sends a purchase receipt built from a persisted order.
    async fn send_receipt(&self, order: &Order) -> Result<(), GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    receipts: Vec<Order>,
    fail: bool,
}

/// In-memory notification gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationGateway {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

impl InMemoryNotificationGateway {
    /// Creates a new in-memory notification gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to fail on send.
    pub fn set_fail(&self, fail: bool) {
        self.state.write().unwrap().fail = fail;
    }

    /// Returns the number of receipts sent.
    pub fn receipt_count(&self) -> usize {
        self.state.read().unwrap().receipts.len()
    }

    /// Returns the most recently sent receipt's order.
    pub fn last_receipt(&self) -> Option<Order> {
        self.state.read().unwrap().receipts.last().cloned()
    }
}

#[async_trait]
impl NotificationGateway for InMemoryNotificationGateway {
    async fn send_receipt(&self, order: &Order) -> Result<(), GatewayError> {
        let mut state = self.state.write().unwrap();
        if state.fail {
            return Err(GatewayError::Transport("mail relay unavailable".to_string()));
        }
        state.receipts.push(order.clone());
        Ok(())
    }
}
