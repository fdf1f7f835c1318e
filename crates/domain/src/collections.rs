//! Names of the keyed-store collections the core reads and writes.

use common::Category;

/// Registered user accounts, keyed by email.
pub const USERS: &str = "users";

/// Administrator accounts, keyed by email. Membership here is re-checked on
/// every privileged call.
pub const ADMINS: &str = "admins";

/// Active session tokens, keyed by token id.
pub const TOKENS: &str = "tokens";

/// Per-user carts, keyed by email. A cart record exists only while the cart
/// is non-empty.
pub const CARTS: &str = "carts";

/// Fulfilled orders, keyed by order id. Append-only.
pub const ORDERS: &str = "orders";

/// Catalog items live in one collection per category, keyed by product name.
pub fn items(category: Category) -> String {
    format!("items:{category}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_collection_name_embeds_category() {
        assert_eq!(items(Category::Pizza), "items:pizza");
        assert_eq!(items(Category::Sauce), "items:sauce");
    }
}
