//! Checkout saga for the ordering core.
//!
//! The coordinator drives a strictly sequential saga with no cross-step
//! atomicity: load cart → re-validate stock → compute total → charge →
//! best-effort fulfillment fan-out. Later steps never undo earlier ones;
//! once the charge succeeds it is never reversed, and the bookkeeping
//! fan-out (cart clearing, order persistence, stock decrement, receipt
//! dispatch) runs as a detached task that tolerates partial failure.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fulfillment;
pub mod gateway;

pub use config::CheckoutConfig;
pub use coordinator::{CheckoutCoordinator, CheckoutOutcome, CheckoutReceipt};
pub use error::{CheckoutError, GatewayError, ShortLine};
pub use fulfillment::FulfillmentReport;
pub use gateway::{
    ChargeResult, InMemoryNotificationGateway, InMemoryPaymentGateway, NotificationGateway,
    PaymentGateway, RecordedCharge,
};
