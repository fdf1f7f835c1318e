//! Typed records for every entity the core persists.

use chrono::{DateTime, Utc};
use common::{Category, Email, OrderId, ProductKey, TokenId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Money;

/// A registered account. The same shape is stored for administrators in the
/// `admins` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub hashed_password: String,
    pub address: String,
}

impl UserRecord {
    /// Full display name for receipts and charge descriptions.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An issued session token. Mutated only by extension; treated as invalid
/// once past expiry without being actively swept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: TokenId,
    pub email: Email,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Returns true once the expiry instant has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A catalog product. `available_stock` is the only field the core mutates,
/// and only downward on fulfilled purchases; the unsigned type keeps it ≥ 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub category: Category,
    pub name: String,
    pub description: String,
    pub unit_price: Decimal,
    pub available_stock: u32,
}

impl Product {
    /// Returns the product's unique catalog key.
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.category, self.name.clone())
    }
}

/// One (category, name) entry in a cart, with the price snapshot taken at
/// the last time the line was touched. Invariant: quantity > 0; a line that
/// reaches 0 is removed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub category: Category,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// Returns the key of the product this line refers to.
    pub fn key(&self) -> ProductKey {
        ProductKey::new(self.category, self.name.clone())
    }
}

/// A user's cart: an ordered collection of lines keyed uniquely by
/// (category, name). An empty cart is represented as the absence of the
/// record, so this type never round-trips through the store while empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty in-memory cart (never persisted in this state).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart from existing lines.
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// The cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Finds the line for a product key, if present.
    pub fn line(&self, key: &ProductKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key() == key)
    }

    /// Replaces the line with the same key, or appends it, preserving the
    /// order of existing lines.
    pub fn set_line(&mut self, line: CartLine) {
        match self.lines.iter_mut().find(|l| l.key() == line.key()) {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    /// Removes the line for a product key. Returns true if a line was
    /// removed.
    pub fn remove_line(&mut self, key: &ProductKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| &line.key() != key);
        self.lines.len() != before
    }
}

/// An immutable record of a fulfilled purchase, created once after a
/// successful charge and never mutated or deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub email: Email,
    pub lines: Vec<CartLine>,
    pub total: Money,
    pub charge_reference: String,
    pub created_at: DateTime<Utc>,
}
