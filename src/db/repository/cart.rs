//! Cart Repository
//!
//! Persisted cart rows for a user. Mutated by the client app; the checkout
//! flow clears them inside the order-creation transaction.

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::CartLine;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart_line";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all cart lines for a user
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<CartLine>> {
        // Link fields are stored as "table:key" strings
        let user = record_id("user", user_id).to_string();
        let lines: Vec<CartLine> = self
            .base
            .db()
            .query("SELECT * FROM cart_line WHERE user = $user")
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(lines)
    }

    /// Add a cart line for a user
    pub async fn add(&self, user_id: &str, product_id: &str, quantity: i64) -> RepoResult<CartLine> {
        let line = CartLine {
            id: None,
            user: record_id("user", user_id),
            product: record_id("product", product_id),
            quantity,
        };
        let created: Option<CartLine> = self.base.db().create(TABLE).content(line).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create cart line".to_string()))
    }

    /// Remove every cart line owned by a user
    pub async fn clear_for_user(&self, user_id: &str) -> RepoResult<()> {
        let user = record_id("user", user_id).to_string();
        self.base
            .db()
            .query("DELETE cart_line WHERE user = $user")
            .bind(("user", user))
            .await?;
        Ok(())
    }
}
