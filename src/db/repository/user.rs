//! User Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::User;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let user: Option<User> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(user)
    }

    /// Create a user with an externally assigned key (platform identity id)
    pub async fn create(&self, key: &str, user: User) -> RepoResult<User> {
        let created: Option<User> = self
            .base
            .db()
            .create((TABLE, strip_table_prefix(TABLE, key)))
            .content(user)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}
