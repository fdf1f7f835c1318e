//! Concurrency tests for cart mutation.
//!
//! The aggregator's read-stock → read-cart → write-cart sequence is a
//! check-then-act that must be serialized per user cart: two concurrent
//! first-line inserts for the same user must merge, not overwrite each
//! other.

use cart::CartService;
use catalog::StockLedger;
use common::{Category, Email, ProductKey};
use domain::Product;
use rust_decimal::Decimal;
use store::MemoryStore;

fn product(category: Category, name: &str, stock: u32) -> Product {
    Product {
        category,
        name: name.to_string(),
        description: String::new(),
        unit_price: Decimal::new(1000, 2),
        available_stock: stock,
    }
}

async fn setup() -> CartService<MemoryStore> {
    let store = MemoryStore::new();
    let ledger = StockLedger::new(store.clone());
    ledger
        .create(product(Category::Pizza, "Margherita", 100))
        .await
        .unwrap();
    ledger
        .create(product(Category::Drink, "Cola", 100))
        .await
        .unwrap();
    CartService::new(store, ledger)
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_first_inserts_do_not_lose_updates() {
    let carts = setup().await;
    let email = Email::parse("ada@example.com").unwrap();
    let key = ProductKey::new(Category::Pizza, "Margherita");

    // Both tasks race to create the first line of a brand-new cart.
    let mut handles = Vec::new();
    for _ in 0..2 {
        let carts = carts.clone();
        let email = email.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            carts.add_or_adjust(&email, &key, 1).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let cart = carts.fetch(&email).await.unwrap().unwrap();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.lines()[0].quantity, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn many_concurrent_deltas_on_one_cart_all_land() {
    let carts = setup().await;
    let email = Email::parse("ada@example.com").unwrap();
    let key = ProductKey::new(Category::Pizza, "Margherita");

    let mut handles = Vec::new();
    for _ in 0..40 {
        let carts = carts.clone();
        let email = email.clone();
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            carts.add_or_adjust(&email, &key, 1).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let cart = carts.fetch(&email).await.unwrap().unwrap();
    assert_eq!(cart.lines()[0].quantity, 40);
}

#[tokio::test(flavor = "multi_thread")]
async fn carts_of_different_users_stay_independent() {
    let carts = setup().await;
    let ada = Email::parse("ada@example.com").unwrap();
    let eve = Email::parse("eve@example.com").unwrap();
    let pizza = ProductKey::new(Category::Pizza, "Margherita");
    let cola = ProductKey::new(Category::Drink, "Cola");

    let mut handles = Vec::new();
    for email in [ada.clone(), eve.clone()] {
        for key in [pizza.clone(), cola.clone()] {
            let carts = carts.clone();
            let email = email.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                carts.add_or_adjust(&email, &key, 3).await
            }));
        }
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for email in [&ada, &eve] {
        let cart = carts.fetch(email).await.unwrap().unwrap();
        assert_eq!(cart.len(), 2);
        assert!(cart.lines().iter().all(|line| line.quantity == 3));
    }
}
