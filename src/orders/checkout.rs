//! Checkout
//!
//! Turns a validated cart into one parent order plus one vendor order per
//! distinct vendor. Stock reservation, ledger writes and the cart clear run
//! in a single transaction: a conditional per-product decrement guards every
//! reserved line, and a failed guard throws so the whole checkout rolls
//! back with nothing written.

use chrono::Utc;
use rust_decimal::Decimal;
use surrealdb::RecordId;
use uuid::Uuid;

use super::OrderLifecycle;
use crate::db::models::{
    CreateOrderRequest, CreatedOrder, Order, OrderLine, OrderStatus, PaymentStatus, VendorOrder,
};
use crate::db::repository::{ProductRepository, record_id};
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Marker thrown inside the checkout transaction when a stock guard fails
const INSUFFICIENT_STOCK: &str = "insufficient-stock";

impl OrderLifecycle {
    /// Create an order for `user` from the submitted cart lines
    ///
    /// Validation failures are reported in a fixed order, each as a distinct
    /// error kind: empty item list, malformed item, unknown product,
    /// insufficient stock, missing address field. Prices are always read
    /// from the catalog, never taken from the request.
    pub async fn create_order(
        &self,
        user: RecordId,
        request: CreateOrderRequest,
    ) -> AppResult<CreatedOrder> {
        if request.items.is_empty() {
            return Err(AppError::invalid_argument(
                "Order must contain at least one item",
            ));
        }
        for item in &request.items {
            if item.product_id.trim().is_empty() {
                return Err(AppError::invalid_argument("Item is missing a product id"));
            }
            if item.quantity < 1 {
                return Err(AppError::invalid_argument(format!(
                    "Quantity for product {} must be positive",
                    item.product_id
                )));
            }
        }

        // Catalog reads: existence, then a read-time stock check that names
        // the product. The transaction below re-checks stock atomically.
        let products = ProductRepository::new(self.db().clone());
        let mut lines: Vec<OrderLine> = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let product = products
                .find_by_id(&item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", item.product_id))
                })?;
            if product.stock < item.quantity {
                return Err(AppError::failed_precondition(format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product.name, product.stock, item.quantity
                )));
            }
            let quantity = Decimal::from(item.quantity);
            lines.push(OrderLine {
                product: record_id("product", &item.product_id),
                product_name: product.name,
                quantity: item.quantity,
                unit_price: product.price,
                line_total: product.price * quantity,
                vendor: product.vendor,
            });
        }

        let address = &request.shipping_address;
        validate_required_text(&address.address, "address", MAX_ADDRESS_LEN)?;
        validate_required_text(&address.city, "city", MAX_ADDRESS_LEN)?;
        validate_required_text(&address.postal_code, "postalCode", MAX_SHORT_TEXT_LEN)?;

        let total: Decimal = lines.iter().map(|l| l.line_total).sum();
        let partitions = partition_by_vendor(&lines);
        let now = Utc::now();

        let order_id = RecordId::from_table_key("order", Uuid::new_v4().simple().to_string());
        let order = Order {
            id: None,
            user: user.clone(),
            lines: lines.clone(),
            total,
            shipping_address: request.shipping_address.clone(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut vendor_orders: Vec<(RecordId, VendorOrder)> =
            Vec::with_capacity(partitions.len());
        for (vendor, vendor_lines) in partitions {
            let subtotal: Decimal = vendor_lines.iter().map(|l| l.line_total).sum();
            let vo_id =
                RecordId::from_table_key("vendor_order", Uuid::new_v4().simple().to_string());
            vendor_orders.push((
                vo_id,
                VendorOrder {
                    id: None,
                    main_order: order_id.clone(),
                    vendor,
                    user: user.clone(),
                    lines: vendor_lines,
                    subtotal,
                    shipping_address: request.shipping_address.clone(),
                    status: OrderStatus::Pending,
                    created_at: now,
                    updated_at: now,
                },
            ));
        }

        // One statement block per reserved product, then the ledger writes
        // and the cart clear, all inside one transaction.
        let mut sql = String::from("BEGIN TRANSACTION;\n");
        for i in 0..lines.len() {
            sql.push_str(&format!(
                "LET $d{i} = (UPDATE $p{i} SET stock -= $q{i}, updated_at = $now \
                 WHERE stock >= $q{i} RETURN AFTER);\n\
                 IF array::len($d{i}) == 0 {{ THROW \"{INSUFFICIENT_STOCK}\" }};\n"
            ));
        }
        sql.push_str("CREATE $order_id CONTENT $order;\n");
        for i in 0..vendor_orders.len() {
            sql.push_str(&format!("CREATE $vo_id{i} CONTENT $vo{i};\n"));
        }
        sql.push_str("DELETE cart_line WHERE user = $cart_user;\n");
        sql.push_str("COMMIT TRANSACTION;");

        // An aborted transaction commits nothing, so a concurrent-write
        // conflict is re-run from scratch up to the retry bound.
        let mut attempts = 0;
        loop {
            let mut query = self
                .db()
                .query(sql.clone())
                .bind(("now", now))
                .bind(("order_id", order_id.clone()))
                .bind(("order", order.clone()))
                .bind(("cart_user", user.to_string()));
            for (i, line) in lines.iter().enumerate() {
                query = query
                    .bind((format!("p{i}"), line.product.clone()))
                    .bind((format!("q{i}"), line.quantity));
            }
            for (i, (vo_id, vendor_order)) in vendor_orders.iter().enumerate() {
                query = query
                    .bind((format!("vo_id{i}"), vo_id.clone()))
                    .bind((format!("vo{i}"), vendor_order.clone()));
            }

            let mut response = query
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            let errors = response.take_errors();
            if errors.is_empty() {
                break;
            }
            if errors
                .values()
                .any(|e| e.to_string().contains(INSUFFICIENT_STOCK))
            {
                return Err(AppError::failed_precondition(
                    "Insufficient stock for one or more items",
                ));
            }
            let detail = errors
                .values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            attempts += 1;
            if attempts < super::TXN_MAX_RETRIES && super::is_retryable_txn_error(&detail) {
                tracing::debug!(attempt = attempts, "Retrying checkout after write conflict");
                continue;
            }
            return Err(AppError::database(detail));
        }

        tracing::info!(
            order_id = %order_id,
            user = %user,
            total = %total,
            "Order created"
        );
        Ok(CreatedOrder {
            order_id: order_id.to_string(),
        })
    }
}

/// Group order lines by vendor, keeping the order vendors first appear in
fn partition_by_vendor(lines: &[OrderLine]) -> Vec<(RecordId, Vec<OrderLine>)> {
    let mut partitions: Vec<(RecordId, Vec<OrderLine>)> = Vec::new();
    for line in lines {
        match partitions.iter_mut().find(|(v, _)| *v == line.vendor) {
            Some((_, bucket)) => bucket.push(line.clone()),
            None => partitions.push((line.vendor.clone(), vec![line.clone()])),
        }
    }
    partitions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(vendor: &str, product: &str, qty: i64) -> OrderLine {
        let price = Decimal::new(500, 2);
        OrderLine {
            product: RecordId::from_table_key("product", product),
            product_name: product.to_string(),
            quantity: qty,
            unit_price: price,
            line_total: price * Decimal::from(qty),
            vendor: RecordId::from_table_key("vendor", vendor),
        }
    }

    #[test]
    fn partitions_preserve_first_appearance_order() {
        let lines = vec![
            line("v2", "p1", 1),
            line("v1", "p2", 2),
            line("v2", "p3", 1),
        ];
        let partitions = partition_by_vendor(&lines);
        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions[0].0, RecordId::from_table_key("vendor", "v2"));
        assert_eq!(partitions[0].1.len(), 2);
        assert_eq!(partitions[1].0, RecordId::from_table_key("vendor", "v1"));
        assert_eq!(partitions[1].1.len(), 1);
    }
}
