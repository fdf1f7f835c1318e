use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of an opaque session token identifier.
pub const TOKEN_ID_LEN: usize = 20;

/// A user's email address, used as the owning key for accounts, carts and
/// session bindings.
///
/// Parsing is structural only: one `@` with a non-empty local part and a
/// dotted domain. Addresses are stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parses an email address, returning `None` if it is malformed.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed != raw {
            return None;
        }
        let (local, domain) = raw.split_once('@')?;
        if local.is_empty() || domain.is_empty() {
            return None;
        }
        let (host, tld) = domain.rsplit_once('.')?;
        if host.is_empty() || tld.len() < 2 || domain.contains('@') {
            return None;
        }
        Some(Self(raw))
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque session token identifier: exactly 20 random alphanumeric
/// characters.
///
/// A caller-supplied string that is not exactly 20 characters is rejected at
/// parse time, so a malformed bearer token fails the same way as an invalid
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    const CHARSET: &'static [u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

    /// Generates a fresh random token identifier.
    pub fn generate() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let id: String = (0..TOKEN_ID_LEN)
            .map(|_| {
                let idx = rng.random_range(0..Self::CHARSET.len());
                Self::CHARSET[idx] as char
            })
            .collect();
        Self(id)
    }

    /// Parses a caller-supplied token id, returning `None` unless it has the
    /// fixed expected length.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.len() == TOKEN_ID_LEN {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Returns the token id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog category a product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pizza,
    Drink,
    Snack,
    Sauce,
}

impl Category {
    /// All known categories, in catalog order.
    pub const ALL: [Category; 4] = [
        Category::Pizza,
        Category::Drink,
        Category::Snack,
        Category::Sauce,
    ];

    /// Returns the lowercase name used in collection keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pizza => "pizza",
            Category::Drink => "drink",
            Category::Snack => "snack",
            Category::Sauce => "sauce",
        }
    }

    /// Parses a category from its lowercase name.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == raw)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique key of a catalog product: category plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub category: Category,
    pub name: String,
}

impl ProductKey {
    /// Creates a product key.
    pub fn new(category: Category, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.category, self.name)
    }
}

/// Unique identifier for a persisted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random order ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an order ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
