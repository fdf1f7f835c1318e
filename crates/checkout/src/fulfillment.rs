//! Best-effort bookkeeping fan-out that runs after a successful charge.

use cart::CartService;
use catalog::StockLedger;
use common::ProductKey;
use domain::{Order, collections};
use store::KeyedStore;

use crate::gateway::NotificationGateway;

/// What the detached fulfillment task managed to complete. Failures are
/// logged inside the task; nothing here is ever surfaced as a checkout
/// failure, and nothing reverses the charge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FulfillmentReport {
    /// The cart record no longer exists.
    pub cart_cleared: bool,
    /// The order record was written to `orders`.
    pub order_persisted: bool,
    /// Lines whose stock decrement failed. Not retried.
    pub failed_decrements: Vec<ProductKey>,
    /// The receipt notification was dispatched.
    pub receipt_sent: bool,
}

/// Runs the four independent bookkeeping actions in sequence: clear the
/// cart, persist the order, decrement stock per line, send the receipt.
/// Each action tolerates the failure of the others.
pub(crate) async fn run<S, N>(
    store: S,
    carts: CartService<S>,
    ledger: StockLedger<S>,
    notifier: N,
    order: Order,
) -> FulfillmentReport
where
    S: KeyedStore + Clone,
    N: NotificationGateway,
{
    let mut report = FulfillmentReport::default();

    match carts.clear(&order.email).await {
        Ok(_) => report.cart_cleared = true,
        Err(e) => {
            tracing::warn!(user = %order.email, error = %e, "cart clear failed after charge");
        }
    }

    match serde_json::to_value(&order) {
        Ok(value) => match store.create(collections::ORDERS, &order.id.to_string(), value).await {
            Ok(()) => report.order_persisted = true,
            Err(e) => {
                tracing::warn!(order = %order.id, error = %e, "order persistence failed after charge");
            }
        },
        Err(e) => {
            tracing::warn!(order = %order.id, error = %e, "order encoding failed after charge");
        }
    }

    for line in &order.lines {
        let key = line.key();
        if let Err(e) = ledger.decrement(&key, line.quantity).await {
            tracing::warn!(product = %key, error = %e, "stock decrement failed after charge");
            report.failed_decrements.push(key);
        }
    }

    match notifier.send_receipt(&order).await {
        Ok(()) => report.receipt_sent = true,
        Err(e) => {
            tracing::warn!(order = %order.id, error = %e, "receipt dispatch failed");
        }
    }

    metrics::counter!("fulfillments_total").increment(1);
    if !report.failed_decrements.is_empty() {
        metrics::counter!("fulfillment_decrement_failures_total")
            .increment(report.failed_decrements.len() as u64);
    }

    report
}
