//! External gateway contracts and their in-memory implementations.

pub mod payment;
pub mod receipt;

pub use payment::{ChargeResult, InMemoryPaymentGateway, PaymentGateway, RecordedCharge};
pub use receipt::{InMemoryNotificationGateway, NotificationGateway};
