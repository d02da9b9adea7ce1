//! Status Transitions and Parent Aggregation
//!
//! Vendor orders carry the authoritative status; the parent order only
//! displays an aggregate recomputed from the full sibling snapshot on every
//! transition. Entering `cancelled` restores the reserved stock, in the
//! same transaction as the status write so it can only happen once.

use chrono::Utc;
use surrealdb::RecordId;

use super::OrderLifecycle;
use crate::db::models::{OrderStatus, VendorOrder};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// Aggregate sibling vendor-order statuses into the parent display status
///
/// Priority: all delivered, all cancelled, any shipped, any processing,
/// otherwise pending. Mixed terminal sets (e.g. one cancelled and one
/// delivered) match no rule and fall through to pending.
pub fn aggregate_status(statuses: &[OrderStatus]) -> OrderStatus {
    if statuses.is_empty() {
        return OrderStatus::Pending;
    }
    if statuses.iter().all(|s| *s == OrderStatus::Delivered) {
        return OrderStatus::Delivered;
    }
    if statuses.iter().all(|s| *s == OrderStatus::Cancelled) {
        return OrderStatus::Cancelled;
    }
    if statuses.iter().any(|s| *s == OrderStatus::Shipped) {
        return OrderStatus::Shipped;
    }
    if statuses.iter().any(|s| *s == OrderStatus::Processing) {
        return OrderStatus::Processing;
    }
    OrderStatus::Pending
}

impl OrderLifecycle {
    /// Apply a vendor-requested status to a vendor order
    ///
    /// `vendor` must own the order. Setting `cancelled` on an already
    /// cancelled order is a no-op; leaving `cancelled` is rejected because
    /// its stock restore cannot be replayed.
    pub async fn update_status(
        &self,
        vendor: &RecordId,
        vendor_order_id: &str,
        new_status: OrderStatus,
    ) -> AppResult<VendorOrder> {
        if !new_status.is_vendor_settable() {
            return Err(AppError::invalid_argument(format!(
                "Status {:?} cannot be set on a vendor order",
                new_status
            )));
        }

        // Serialize read + transition + sibling read + parent write. The
        // lock is taken before the order is read so the no-op check, the
        // reopen check and the $old guard value never act on a stale
        // status snapshot.
        let _guard = self.status_lock.lock().await;

        let orders = OrderRepository::new(self.db().clone());
        let order = orders
            .find_vendor_order_by_id(vendor_order_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Vendor order {} not found", vendor_order_id))
            })?;
        if order.vendor != *vendor {
            return Err(AppError::permission_denied(
                "Vendor order belongs to another vendor",
            ));
        }

        if order.status == new_status {
            return Ok(order);
        }
        if order.status == OrderStatus::Cancelled {
            return Err(AppError::failed_precondition(
                "Cancelled orders cannot be reopened",
            ));
        }

        let order_rid = order
            .id
            .clone()
            .ok_or_else(|| AppError::internal("Vendor order record has no id"))?;
        let now = Utc::now();

        // Guarded write: the transition applies at most once, and the stock
        // restore only runs when the guarded write actually applied.
        let mut sql = String::from(
            "BEGIN TRANSACTION;\n\
             LET $applied = (UPDATE $vo SET status = $new, updated_at = $now \
             WHERE status = $old RETURN AFTER);\n",
        );
        let restoring = new_status == OrderStatus::Cancelled;
        if restoring {
            sql.push_str("IF array::len($applied) != 0 {\n");
            for i in 0..order.lines.len() {
                sql.push_str(&format!(
                    "    UPDATE $p{i} SET stock += $q{i}, updated_at = $now;\n"
                ));
            }
            sql.push_str("};\n");
        }
        sql.push_str("COMMIT TRANSACTION;");

        // Re-run on a concurrent-write conflict (nothing was committed)
        let mut attempts = 0;
        loop {
            let mut query = self
                .db()
                .query(sql.clone())
                .bind(("vo", order_rid.clone()))
                .bind(("new", new_status))
                .bind(("old", order.status))
                .bind(("now", now));
            if restoring {
                for (i, line) in order.lines.iter().enumerate() {
                    query = query
                        .bind((format!("p{i}"), line.product.clone()))
                        .bind((format!("q{i}"), line.quantity));
                }
            }
            let mut response = query
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            let errors = response.take_errors();
            if errors.is_empty() {
                break;
            }
            let detail = errors
                .values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            attempts += 1;
            if attempts < super::TXN_MAX_RETRIES && super::is_retryable_txn_error(&detail) {
                tracing::debug!(attempt = attempts, "Retrying status update after write conflict");
                continue;
            }
            return Err(AppError::database(detail));
        }

        let siblings = orders.sibling_statuses(&order.main_order).await?;
        let parent_status = aggregate_status(&siblings);
        orders
            .set_parent_status(&order.main_order, parent_status)
            .await?;

        tracing::info!(
            vendor_order = %order_rid,
            from = ?order.status,
            to = ?new_status,
            parent = ?parent_status,
            "Order status updated"
        );

        let updated = orders
            .find_vendor_order_by_id(vendor_order_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Vendor order {} not found", vendor_order_id))
            })?;
        Ok(updated)
    }
}
