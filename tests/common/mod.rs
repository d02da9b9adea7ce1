//! Shared test fixtures: an embedded database in a tempdir plus seeding
//! helpers for users, vendors, categories and products.
#![allow(dead_code)]

use bazaar_server::core::{Config, ServerState};
use bazaar_server::db::models::{CategoryCreate, ProductCreate, User, Vendor};
use bazaar_server::db::repository::{
    CategoryRepository, ProductRepository, UserRepository, VendorRepository,
};
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};
use tempfile::TempDir;

/// Fresh server state over a throwaway database
///
/// The TempDir must stay alive for the duration of the test.
pub async fn test_state() -> (TempDir, ServerState) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("bazaar").use_db("storefront").await.unwrap();

    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::with_db(&config, db);
    (tmp, state)
}

pub async fn seed_user(state: &ServerState, key: &str, username: &str, is_admin: bool) {
    let repo = UserRepository::new(state.get_db());
    let mut user = User::new(username.to_string());
    user.is_admin = is_admin;
    repo.create(key, user).await.unwrap();
}

/// Create a user plus its vendor record under the same key
pub async fn seed_vendor(state: &ServerState, key: &str, name: &str) {
    seed_user(state, key, name, false).await;
    let repo = VendorRepository::new(state.get_db());
    repo.create(key, Vendor::new(name.to_string())).await.unwrap();
}

pub async fn seed_category(state: &ServerState, name: &str) -> String {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .create(CategoryCreate {
            name: name.to_string(),
            description: None,
            image_url: None,
        })
        .await
        .unwrap();
    category.id.unwrap().key().to_string()
}

/// Create a product and return its bare key
pub async fn seed_product(
    state: &ServerState,
    vendor_key: &str,
    category_id: &str,
    name: &str,
    price_cents: i64,
    stock: i64,
) -> String {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .create(
            surrealdb::RecordId::from_table_key("vendor", vendor_key),
            ProductCreate {
                name: name.to_string(),
                price: Decimal::new(price_cents, 2),
                stock,
                category_id: category_id.to_string(),
            },
        )
        .await
        .unwrap();
    product.id.unwrap().key().to_string()
}

pub async fn product_stock(state: &ServerState, product_id: &str) -> i64 {
    let repo = ProductRepository::new(state.get_db());
    repo.find_by_id(product_id).await.unwrap().unwrap().stock
}
