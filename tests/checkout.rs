//! Checkout flow: end-to-end scenario, stock guards, validation order.
//! Run: cargo test --test checkout

mod common;

use bazaar_server::db::models::{
    CreateOrderRequest, OrderItemRequest, OrderStatus, PaymentStatus, ShippingAddress,
};
use bazaar_server::db::repository::{CartRepository, OrderRepository, record_id};
use bazaar_server::utils::AppError;
use rust_decimal::Decimal;

fn address() -> ShippingAddress {
    ShippingAddress {
        address: "1 Market St".to_string(),
        city: "Lisbon".to_string(),
        postal_code: "1100-000".to_string(),
    }
}

fn request(items: Vec<(String, i64)>) -> CreateOrderRequest {
    CreateOrderRequest {
        items: items
            .into_iter()
            .map(|(product_id, quantity)| OrderItemRequest {
                product_id,
                quantity,
            })
            .collect(),
        shipping_address: address(),
    }
}

#[tokio::test]
async fn end_to_end_single_vendor_checkout() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "customer", false).await;
    let cat = common::seed_category(&state, "Coffee").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Espresso Beans", 500, 10).await;

    // Persisted cart rows should be cleared by the checkout
    let cart = CartRepository::new(state.get_db());
    cart.add("c1", &p1, 2).await.unwrap();

    let created = state
        .lifecycle
        .create_order(record_id("user", "c1"), request(vec![(p1.clone(), 2)]))
        .await
        .unwrap();
    assert!(created.order_id.starts_with("order:"));

    let orders = OrderRepository::new(state.get_db());
    let parent = orders
        .find_by_id(&created.order_id)
        .await
        .unwrap()
        .expect("parent order persisted");
    assert_eq!(parent.total, Decimal::new(1000, 2));
    assert_eq!(parent.status, OrderStatus::Pending);
    assert_eq!(parent.payment_status, PaymentStatus::Pending);
    assert_eq!(parent.lines.len(), 1);
    assert_eq!(parent.lines[0].unit_price, Decimal::new(500, 2));
    assert_eq!(parent.lines[0].line_total, Decimal::new(1000, 2));

    let vendor_orders = orders
        .find_by_vendor(&record_id("vendor", "v1"))
        .await
        .unwrap();
    assert_eq!(vendor_orders.len(), 1);
    assert_eq!(vendor_orders[0].subtotal, Decimal::new(1000, 2));
    assert_eq!(vendor_orders[0].status, OrderStatus::Pending);

    assert_eq!(common::product_stock(&state, &p1).await, 8);
    assert!(cart.find_by_user("c1").await.unwrap().is_empty());
}

#[tokio::test]
async fn checkout_splits_lines_per_vendor() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_vendor(&state, "v2", "Vendor Two").await;
    common::seed_user(&state, "c1", "customer", false).await;
    let cat = common::seed_category(&state, "Food").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Bread", 300, 5).await;
    let p2 = common::seed_product(&state, "v2", &cat, "Cheese", 700, 5).await;

    state
        .lifecycle
        .create_order(
            record_id("user", "c1"),
            request(vec![(p1.clone(), 1), (p2.clone(), 2)]),
        )
        .await
        .unwrap();

    let orders = OrderRepository::new(state.get_db());
    let v1_orders = orders
        .find_by_vendor(&record_id("vendor", "v1"))
        .await
        .unwrap();
    let v2_orders = orders
        .find_by_vendor(&record_id("vendor", "v2"))
        .await
        .unwrap();
    assert_eq!(v1_orders.len(), 1);
    assert_eq!(v2_orders.len(), 1);
    assert_eq!(v1_orders[0].subtotal, Decimal::new(300, 2));
    assert_eq!(v2_orders[0].subtotal, Decimal::new(1400, 2));
    assert_eq!(v1_orders[0].main_order, v2_orders[0].main_order);

    let parent = orders
        .find_by_id(&v1_orders[0].main_order.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(parent.total, Decimal::new(1700, 2));
}

#[tokio::test]
async fn insufficient_stock_writes_nothing() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "customer", false).await;
    let cat = common::seed_category(&state, "Coffee").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Beans", 500, 1).await;

    let err = state
        .lifecycle
        .create_order(record_id("user", "c1"), request(vec![(p1.clone(), 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    assert_eq!(common::product_stock(&state, &p1).await, 1);
    let orders = OrderRepository::new(state.get_db());
    assert!(orders.find_by_user("c1").await.unwrap().is_empty());
    assert!(
        orders
            .find_by_vendor(&record_id("vendor", "v1"))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn concurrent_checkouts_cannot_oversell() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "alice", false).await;
    common::seed_user(&state, "c2", "bob", false).await;
    let cat = common::seed_category(&state, "Coffee").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Beans", 500, 1).await;

    // Both orders want the last unit
    let first = state
        .lifecycle
        .create_order(record_id("user", "c1"), request(vec![(p1.clone(), 1)]));
    let second = state
        .lifecycle
        .create_order(record_id("user", "c2"), request(vec![(p1.clone(), 1)]));
    let (first, second) = tokio::join!(first, second);

    let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one checkout may win the last unit");
    let loser = [first, second]
        .into_iter()
        .find(|r| r.is_err())
        .unwrap()
        .unwrap_err();
    assert!(matches!(loser, AppError::FailedPrecondition(_)));

    // Stock never went negative and only the winner left a ledger trail
    assert_eq!(common::product_stock(&state, &p1).await, 0);
    let orders = OrderRepository::new(state.get_db());
    let order_count = orders.find_by_user("c1").await.unwrap().len()
        + orders.find_by_user("c2").await.unwrap().len();
    assert_eq!(order_count, 1);
}

#[tokio::test]
async fn validation_failures_report_in_order() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "customer", false).await;
    let cat = common::seed_category(&state, "Coffee").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Beans", 500, 10).await;
    let user = record_id("user", "c1");

    // 1. empty item list
    let err = state
        .lifecycle
        .create_order(user.clone(), request(vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    // 2. non-positive quantity
    let err = state
        .lifecycle
        .create_order(user.clone(), request(vec![(p1.clone(), 0)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    // 3. unknown product wins over the later address check
    let mut req = request(vec![("nope".to_string(), 1)]);
    req.shipping_address.city = String::new();
    let err = state.lifecycle.create_order(user.clone(), req).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // 4. insufficient stock wins over the later address check
    let mut req = request(vec![(p1.clone(), 99)]);
    req.shipping_address.city = String::new();
    let err = state.lifecycle.create_order(user.clone(), req).await.unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    // 5. missing address field
    let mut req = request(vec![(p1.clone(), 1)]);
    req.shipping_address.postal_code = "  ".to_string();
    let err = state.lifecycle.create_order(user.clone(), req).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    // Nothing was written along the way
    assert_eq!(common::product_stock(&state, &p1).await, 10);
    let orders = OrderRepository::new(state.get_db());
    assert!(orders.find_by_user("c1").await.unwrap().is_empty());
}

#[tokio::test]
async fn prices_come_from_the_catalog() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "customer", false).await;
    let cat = common::seed_category(&state, "Coffee").await;
    let p1 = common::seed_product(&state, "v1", &cat, "Beans", 1234, 10).await;

    let created = state
        .lifecycle
        .create_order(record_id("user", "c1"), request(vec![(p1.clone(), 3)]))
        .await
        .unwrap();

    let orders = OrderRepository::new(state.get_db());
    let parent = orders.find_by_id(&created.order_id).await.unwrap().unwrap();
    assert_eq!(parent.lines[0].unit_price, Decimal::new(1234, 2));
    assert_eq!(parent.total, Decimal::new(3702, 2));
}
