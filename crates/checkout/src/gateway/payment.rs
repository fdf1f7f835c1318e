//! Payment gateway trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::Money;

use crate::error::GatewayError;

/// Result of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeResult {
    /// The charge reference assigned by the gateway.
    pub reference: String,
}

/// Trait for payment gateway operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges an amount in minor currency units against a payment source.
    async fn charge(
        &self,
        amount: Money,
        currency: &str,
        source: &str,
        description: &str,
    ) -> Result<ChargeResult, GatewayError>;
}

/// A charge observed by the in-memory gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCharge {
    pub amount: Money,
    pub currency: String,
    pub source: String,
    pub description: String,
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    charges: Vec<RecordedCharge>,
    next_id: u32,
    decline: bool,
    fail_transport: bool,
}

/// In-memory payment gateway for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentGateway {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentGateway {
    /// Creates a new in-memory payment gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to decline charges.
    pub fn set_decline(&self, decline: bool) {
        self.state.write().unwrap().decline = decline;
    }

    /// Configures the gateway to fail at the transport level.
    pub fn set_fail_transport(&self, fail: bool) {
        self.state.write().unwrap().fail_transport = fail;
    }

    /// Returns the number of successful charges.
    pub fn charge_count(&self) -> usize {
        self.state.read().unwrap().charges.len()
    }

    /// Returns the most recent successful charge.
    pub fn last_charge(&self) -> Option<RecordedCharge> {
        self.state.read().unwrap().charges.last().cloned()
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    async fn charge(
        &self,
        amount: Money,
        currency: &str,
        source: &str,
        description: &str,
    ) -> Result<ChargeResult, GatewayError> {
        let mut state = self.state.write().unwrap();

        if state.fail_transport {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        if state.decline {
            return Err(GatewayError::Declined("card declined".to_string()));
        }

        state.next_id += 1;
        let reference = format!("ch_{:06}", state.next_id);
        state.charges.push(RecordedCharge {
            amount,
            currency: currency.to_string(),
            source: source.to_string(),
            description: description.to_string(),
        });

        Ok(ChargeResult { reference })
    }
}
