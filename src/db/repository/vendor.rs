//! Vendor Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::Vendor;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "vendor";

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find vendor by id (same key space as the owning user id)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Vendor>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let vendor: Option<Vendor> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(vendor)
    }

    /// Create a vendor keyed by the owning user id
    pub async fn create(&self, key: &str, vendor: Vendor) -> RepoResult<Vendor> {
        let created: Option<Vendor> = self
            .base
            .db()
            .create((TABLE, strip_table_prefix(TABLE, key)))
            .content(vendor)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create vendor".to_string()))
    }
}
