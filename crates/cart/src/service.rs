//! The cart aggregator: stock-checked quantity merging.

use catalog::{CatalogError, StockLedger};
use common::{Email, ProductKey};
use domain::{Cart, CartLine, collections};
use store::{KeyLocks, KeyedStore};
use tokio::sync::OwnedMutexGuard;

use crate::error::{CartError, Result};

/// Merges quantity deltas into per-user carts.
///
/// Clones share the per-cart lock registry; construct one service per store
/// and clone it wherever carts are touched (the checkout coordinator holds a
/// clone so cart mutation and checkout of the same user never interleave).
#[derive(Clone)]
pub struct CartService<S> {
    store: S,
    ledger: StockLedger<S>,
    locks: KeyLocks,
}

impl<S: KeyedStore + Clone> CartService<S> {
    /// Creates a cart service over the given store and stock ledger.
    pub fn new(store: S, ledger: StockLedger<S>) -> Self {
        Self {
            store,
            ledger,
            locks: KeyLocks::new(),
        }
    }

    /// Acquires the mutation lock for one user's cart.
    ///
    /// Held internally by every mutation; the checkout coordinator holds it
    /// across cart load, stock re-validation and the charge so a concurrent
    /// `add_or_adjust` cannot slip between its reads and the charge.
    pub async fn lock(&self, email: &Email) -> OwnedMutexGuard<()> {
        self.locks
            .acquire(&format!("{}:{}", collections::CARTS, email))
            .await
    }

    /// Merges a quantity delta into the user's cart line for a product.
    ///
    /// `delta` must be non-zero and may be negative. The merged quantity is
    /// checked against the product's current stock (a point-in-time check
    /// that checkout re-validates later); the line's price snapshot is
    /// refreshed to the product's current price. A merged quantity of zero
    /// removes the line, and a cart losing its last line is deleted rather
    /// than stored empty.
    #[tracing::instrument(skip(self), fields(user = %email, product = %key))]
    pub async fn add_or_adjust(
        &self,
        email: &Email,
        key: &ProductKey,
        delta: i64,
    ) -> Result<Cart> {
        if delta == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let _guard = self.lock(email).await;

        let product = match self.ledger.read(key).await {
            Ok(product) => product,
            Err(CatalogError::ProductNotFound(key)) => {
                return Err(CartError::ProductNotFound(key));
            }
            Err(e) => return Err(e.into()),
        };

        let existing = self.load(email).await?;
        let mut cart = existing.clone().unwrap_or_default();

        let current = cart.line(key).map_or(0, |line| i64::from(line.quantity));
        let resulting = current + delta;

        if resulting < 0 {
            return Err(CartError::NegativeQuantity { key: key.clone() });
        }
        let resulting = resulting as u64;
        if resulting > u64::from(product.available_stock) {
            return Err(CartError::StockExceeded {
                key: key.clone(),
                available: product.available_stock,
                requested: resulting,
            });
        }
        // Bounded by available_stock above, so the narrowing is lossless.
        let resulting = resulting as u32;

        if resulting == 0 {
            cart.remove_line(key);
        } else {
            cart.set_line(CartLine {
                category: key.category,
                name: key.name.clone(),
                unit_price: product.unit_price,
                quantity: resulting,
            });
        }

        self.persist(email, existing.is_some(), &cart).await?;
        metrics::counter!("cart_mutations_total").increment(1);
        tracing::debug!(lines = cart.len(), "cart updated");
        Ok(cart)
    }

    /// Returns the user's current cart, or `None` if no cart record exists.
    pub async fn fetch(&self, email: &Email) -> Result<Option<Cart>> {
        self.load(email).await
    }

    /// Deletes the user's cart record under the cart lock. Returns false if
    /// there was no cart to clear.
    #[tracing::instrument(skip(self), fields(user = %email))]
    pub async fn clear(&self, email: &Email) -> Result<bool> {
        let _guard = self.lock(email).await;
        match self.store.delete(collections::CARTS, email.as_str()).await {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self, email: &Email) -> Result<Option<Cart>> {
        match self.store.read(collections::CARTS, email.as_str()).await {
            Ok(value) => Ok(Some(serde_json::from_value(value)?)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, email: &Email, existed: bool, cart: &Cart) -> Result<()> {
        let key = email.as_str();
        if !existed {
            // First line of a new cart
            self.store
                .create(collections::CARTS, key, serde_json::to_value(cart)?)
                .await?;
        } else if cart.is_empty() {
            // Last line removed: absence, not an empty record
            self.store.delete(collections::CARTS, key).await?;
        } else {
            self.store
                .update(collections::CARTS, key, serde_json::to_value(cart)?)
                .await?;
        }
        Ok(())
    }
}
