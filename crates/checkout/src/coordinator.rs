//! The checkout saga coordinator.

use cart::CartService;
use catalog::{CatalogError, StockLedger};
use common::{Email, OrderId};
use domain::{Order, UserRecord, collections, pricing};
use store::KeyedStore;
use tokio::task::JoinHandle;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, Result, ShortLine};
use crate::fulfillment::{self, FulfillmentReport};
use crate::gateway::{NotificationGateway, PaymentGateway};

/// What the caller gets back from a checkout.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The user has no cart (or an empty one). Nothing was charged, no
    /// external call was made.
    NoCart,
    /// The charge succeeded. Bookkeeping runs in the detached `fulfillment`
    /// task; its failures never surface here.
    Charged {
        receipt: CheckoutReceipt,
        fulfillment: JoinHandle<FulfillmentReport>,
    },
}

/// Caller-facing summary of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub charge_reference: String,
    pub total: domain::Money,
}

/// Drives the checkout saga: load cart, re-validate stock, compute the
/// total, charge, then fan out bookkeeping.
///
/// The saga is strictly sequential and not atomic. Later steps never undo
/// earlier ones; a successful charge is never reversed. Steps up to and
/// including the charge run holding the user's cart lock, so a concurrent
/// cart mutation cannot slip between the stock re-validation and the charge.
pub struct CheckoutCoordinator<S, P, N> {
    store: S,
    carts: CartService<S>,
    ledger: StockLedger<S>,
    payment: P,
    notifier: N,
    config: CheckoutConfig,
}

impl<S, P, N> CheckoutCoordinator<S, P, N>
where
    S: KeyedStore + Clone + 'static,
    P: PaymentGateway,
    N: NotificationGateway + Clone + 'static,
{
    /// Creates a coordinator. `carts` and `ledger` must be clones of the
    /// instances the rest of the system mutates through, so the per-key lock
    /// registries are shared.
    pub fn new(
        store: S,
        carts: CartService<S>,
        ledger: StockLedger<S>,
        payment: P,
        notifier: N,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            store,
            carts,
            ledger,
            payment,
            notifier,
            config,
        }
    }

    /// Runs the checkout saga for one user.
    ///
    /// Returns as soon as the charge succeeds; cart clearing, order
    /// persistence, stock decrements and receipt dispatch continue in the
    /// returned outcome's detached task. There is no idempotency key on the
    /// charge, so retrying after a lost response can charge twice.
    #[tracing::instrument(skip(self), fields(user = %email))]
    pub async fn checkout(&self, email: &Email) -> Result<CheckoutOutcome> {
        let user = self.load_user(email).await?;

        let guard = self.carts.lock(email).await;

        let cart = match self.carts.fetch(email).await? {
            Some(cart) if !cart.is_empty() => cart,
            _ => {
                tracing::debug!("no cart to check out");
                return Ok(CheckoutOutcome::NoCart);
            }
        };

        let mut short = Vec::new();
        for line in cart.lines() {
            let key = line.key();
            match self.ledger.read(&key).await {
                Ok(product) if product.available_stock >= line.quantity => {}
                Ok(product) => short.push(ShortLine {
                    key,
                    available: product.available_stock,
                    requested: line.quantity,
                }),
                Err(CatalogError::ProductNotFound(key)) => short.push(ShortLine {
                    key,
                    available: 0,
                    requested: line.quantity,
                }),
                Err(e) => return Err(e.into()),
            }
        }
        if !short.is_empty() {
            metrics::counter!("checkouts_total", "outcome" => "insufficient_stock").increment(1);
            return Err(CheckoutError::InsufficientStock(short));
        }

        let total = pricing::cart_total(cart.lines()).ok_or(CheckoutError::AmountUnavailable)?;

        let description = format!(
            "{}: charge for {}",
            self.config.description_prefix,
            user.full_name()
        );
        let charge = match self
            .payment
            .charge(total, &self.config.currency, &self.config.source_token, &description)
            .await
        {
            Ok(charge) => charge,
            Err(e) => {
                metrics::counter!("checkouts_total", "outcome" => "charge_failed").increment(1);
                return Err(e.into());
            }
        };
        tracing::info!(reference = %charge.reference, amount = %total, "charge succeeded");

        let order = Order {
            id: OrderId::new(),
            email: email.clone(),
            lines: cart.lines().to_vec(),
            total,
            charge_reference: charge.reference.clone(),
            created_at: chrono::Utc::now(),
        };

        // The fan-out's cart clear re-acquires the lock.
        drop(guard);

        let fulfillment = tokio::spawn(fulfillment::run(
            self.store.clone(),
            self.carts.clone(),
            self.ledger.clone(),
            self.notifier.clone(),
            order.clone(),
        ));

        metrics::counter!("checkouts_total", "outcome" => "charged").increment(1);
        metrics::histogram!("checkout_amount_cents").record(total.cents() as f64);

        Ok(CheckoutOutcome::Charged {
            receipt: CheckoutReceipt {
                order_id: order.id,
                charge_reference: charge.reference,
                total,
            },
            fulfillment,
        })
    }

    /// The account record behind the charge description. A checkout for an
    /// email with no account is an internal error: callers authenticate
    /// before reaching the saga.
    async fn load_user(&self, email: &Email) -> Result<UserRecord> {
        match self.store.read(collections::USERS, email.as_str()).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(e) if e.is_not_found() => Err(CheckoutError::InternalRead(format!(
                "no account record for {email}"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
