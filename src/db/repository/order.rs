//! Order Ledger Repository
//!
//! Read side of the order ledger plus the parent-status write used by the
//! aggregation rule. Multi-record writes (checkout, status transition with
//! stock restore) are issued by the lifecycle engine as transactions.

use super::{BaseRepository, RepoResult, record_id, strip_table_prefix};
use crate::db::models::{Order, OrderStatus, VendorOrder};
use chrono::Utc;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "order";
const VENDOR_ORDER_TABLE: &str = "vendor_order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find parent order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find all parent orders for a user, newest first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        // Link fields are stored as "table:key" strings
        let user = record_id("user", user_id).to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find vendor order by id
    pub async fn find_vendor_order_by_id(&self, id: &str) -> RepoResult<Option<VendorOrder>> {
        let pure_id = strip_table_prefix(VENDOR_ORDER_TABLE, id);
        let order: Option<VendorOrder> =
            self.base.db().select((VENDOR_ORDER_TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find all vendor orders for a vendor, newest first
    pub async fn find_by_vendor(&self, vendor: &RecordId) -> RepoResult<Vec<VendorOrder>> {
        let orders: Vec<VendorOrder> = self
            .base
            .db()
            .query("SELECT * FROM vendor_order WHERE vendor = $vendor ORDER BY created_at DESC")
            .bind(("vendor", vendor.to_string()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Statuses of every vendor order sharing a parent
    pub async fn sibling_statuses(&self, main_order: &RecordId) -> RepoResult<Vec<OrderStatus>> {
        let statuses: Vec<OrderStatus> = self
            .base
            .db()
            .query("SELECT VALUE status FROM vendor_order WHERE main_order = $main")
            .bind(("main", main_order.to_string()))
            .await?
            .take(0)?;
        Ok(statuses)
    }

    /// Write the aggregated status onto the parent order
    pub async fn set_parent_status(
        &self,
        main_order: &RecordId,
        status: OrderStatus,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $order SET status = $status, updated_at = $now")
            .bind(("order", main_order.clone()))
            .bind(("status", status))
            .bind(("now", Utc::now()))
            .await?;
        Ok(())
    }
}
