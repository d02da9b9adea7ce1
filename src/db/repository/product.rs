//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, strip_table_prefix};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use chrono::Utc;
use serde::Serialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all products ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let product: Option<Product> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Find all products owned by a vendor
    pub async fn find_by_vendor(&self, vendor: &RecordId) -> RepoResult<Vec<Product>> {
        // Link fields are stored as "table:key" strings
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE vendor = $vendor ORDER BY name")
            .bind(("vendor", vendor.to_string()))
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Create a new product owned by `vendor`
    pub async fn create(&self, vendor: RecordId, data: ProductCreate) -> RepoResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: None,
            name: data.name,
            price: data.price,
            stock: data.stock,
            category: record_id("category", &data.category_id),
            vendor,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        #[derive(Serialize)]
        struct ProductUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            price: Option<rust_decimal::Decimal>,
            #[serde(skip_serializing_if = "Option::is_none")]
            stock: Option<i64>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            updated_at: chrono::DateTime<Utc>,
        }

        let update_data = ProductUpdateDb {
            name: data.name,
            price: data.price,
            stock: data.stock,
            category: data
                .category_id
                .as_deref()
                .map(|c| record_id("category", c).to_string()),
            updated_at: Utc::now(),
        };

        let pure_id = strip_table_prefix(TABLE, id);
        let thing = record_id(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);
        let result: Option<Product> = self.base.db().delete((TABLE, pure_id)).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Product {} not found", id)));
        }
        Ok(())
    }
}
