//! Status transitions: stock restoration, cancel idempotence and parent
//! aggregation across sibling vendor orders.
//! Run: cargo test --test status_lifecycle

mod common;

use bazaar_server::core::ServerState;
use bazaar_server::db::models::{
    CreateOrderRequest, Order, OrderItemRequest, OrderStatus, ShippingAddress, VendorOrder,
};
use bazaar_server::db::repository::{OrderRepository, record_id};
use bazaar_server::utils::AppError;

fn request(items: Vec<(String, i64)>) -> CreateOrderRequest {
    CreateOrderRequest {
        items: items
            .into_iter()
            .map(|(product_id, quantity)| OrderItemRequest {
                product_id,
                quantity,
            })
            .collect(),
        shipping_address: ShippingAddress {
            address: "1 Market St".to_string(),
            city: "Lisbon".to_string(),
            postal_code: "1100-000".to_string(),
        },
    }
}

async fn vendor_order_of(state: &ServerState, vendor_key: &str) -> VendorOrder {
    let orders = OrderRepository::new(state.get_db());
    let mut found = orders
        .find_by_vendor(&record_id("vendor", vendor_key))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    found.remove(0)
}

async fn parent_of(state: &ServerState, vendor_order: &VendorOrder) -> Order {
    let orders = OrderRepository::new(state.get_db());
    orders
        .find_by_id(&vendor_order.main_order.to_string())
        .await
        .unwrap()
        .unwrap()
}

/// Two-vendor order fixture: v1 owns p1 (qty 2 of stock 10), v2 owns p2
/// (qty 1 of stock 5).
async fn two_vendor_order(state: &ServerState) -> (String, String) {
    common::seed_vendor(state, "v1", "Vendor One").await;
    common::seed_vendor(state, "v2", "Vendor Two").await;
    common::seed_user(state, "c1", "customer", false).await;
    let cat = common::seed_category(state, "Food").await;
    let p1 = common::seed_product(state, "v1", &cat, "Bread", 300, 10).await;
    let p2 = common::seed_product(state, "v2", &cat, "Cheese", 700, 5).await;

    state
        .lifecycle
        .create_order(
            record_id("user", "c1"),
            request(vec![(p1.clone(), 2), (p2.clone(), 1)]),
        )
        .await
        .unwrap();
    (p1, p2)
}

#[tokio::test]
async fn cancellation_restores_stock_exactly_once() {
    let (_tmp, state) = common::test_state().await;
    let (p1, _p2) = two_vendor_order(&state).await;
    assert_eq!(common::product_stock(&state, &p1).await, 8);

    let vo = vendor_order_of(&state, "v1").await;
    let vo_id = vo.id.clone().unwrap().to_string();

    let updated = state
        .lifecycle
        .update_status(&record_id("vendor", "v1"), &vo_id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);
    assert_eq!(common::product_stock(&state, &p1).await, 10);

    // Repeating the cancel is a no-op on stock
    let again = state
        .lifecycle
        .update_status(&record_id("vendor", "v1"), &vo_id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(again.status, OrderStatus::Cancelled);
    assert_eq!(common::product_stock(&state, &p1).await, 10);
}

#[tokio::test]
async fn cancelled_orders_cannot_be_reopened() {
    let (_tmp, state) = common::test_state().await;
    let (p1, _p2) = two_vendor_order(&state).await;

    let vo = vendor_order_of(&state, "v1").await;
    let vo_id = vo.id.clone().unwrap().to_string();
    state
        .lifecycle
        .update_status(&record_id("vendor", "v1"), &vo_id, OrderStatus::Cancelled)
        .await
        .unwrap();

    let err = state
        .lifecycle
        .update_status(&record_id("vendor", "v1"), &vo_id, OrderStatus::Processing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
    assert_eq!(common::product_stock(&state, &p1).await, 10);
}

#[tokio::test]
async fn display_only_statuses_are_rejected() {
    let (_tmp, state) = common::test_state().await;
    two_vendor_order(&state).await;

    let vo = vendor_order_of(&state, "v1").await;
    let vo_id = vo.id.clone().unwrap().to_string();
    for status in [
        OrderStatus::Confirmed,
        OrderStatus::OutForDelivery,
        OrderStatus::Returned,
    ] {
        let err = state
            .lifecycle
            .update_status(&record_id("vendor", "v1"), &vo_id, status)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }
}

#[tokio::test]
async fn other_vendors_orders_are_off_limits() {
    let (_tmp, state) = common::test_state().await;
    two_vendor_order(&state).await;

    let vo = vendor_order_of(&state, "v1").await;
    let vo_id = vo.id.clone().unwrap().to_string();
    let err = state
        .lifecycle
        .update_status(&record_id("vendor", "v2"), &vo_id, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    // Rejection had no side effects
    assert_eq!(
        vendor_order_of(&state, "v1").await.status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn racing_transitions_never_report_a_lost_write_as_success() {
    let (_tmp, state) = common::test_state().await;
    let (p1, _p2) = two_vendor_order(&state).await;

    let vo = vendor_order_of(&state, "v1").await;
    let vo_id = vo.id.clone().unwrap().to_string();
    let v1 = record_id("vendor", "v1");

    // A cancel and a processing request race for the same vendor order
    let cancel = state
        .lifecycle
        .update_status(&v1, &vo_id, OrderStatus::Cancelled);
    let process = state
        .lifecycle
        .update_status(&v1, &vo_id, OrderStatus::Processing);
    let (cancel, process) = tokio::join!(cancel, process);

    assert_eq!(cancel.unwrap().status, OrderStatus::Cancelled);

    // The processing request either ran first and applied, or saw the
    // already-cancelled order and was rejected. It must never succeed
    // without its write having been applied.
    match process {
        Ok(updated) => assert_eq!(updated.status, OrderStatus::Processing),
        Err(err) => assert!(matches!(err, AppError::FailedPrecondition(_))),
    }

    // Terminal state and single stock restoration hold either way
    assert_eq!(
        vendor_order_of(&state, "v1").await.status,
        OrderStatus::Cancelled
    );
    assert_eq!(common::product_stock(&state, &p1).await, 10);
}

#[tokio::test]
async fn parent_status_follows_the_aggregation_rule() {
    let (_tmp, state) = common::test_state().await;
    two_vendor_order(&state).await;

    let vo1 = vendor_order_of(&state, "v1").await;
    let vo2 = vendor_order_of(&state, "v2").await;
    let vo1_id = vo1.id.clone().unwrap().to_string();
    let vo2_id = vo2.id.clone().unwrap().to_string();
    let v1 = record_id("vendor", "v1");
    let v2 = record_id("vendor", "v2");

    // {shipped, pending} -> shipped
    state
        .lifecycle
        .update_status(&v1, &vo1_id, OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(parent_of(&state, &vo1).await.status, OrderStatus::Shipped);

    // {shipped, processing} -> shipped
    state
        .lifecycle
        .update_status(&v2, &vo2_id, OrderStatus::Processing)
        .await
        .unwrap();
    assert_eq!(parent_of(&state, &vo1).await.status, OrderStatus::Shipped);

    // {delivered, delivered} -> delivered
    state
        .lifecycle
        .update_status(&v1, &vo1_id, OrderStatus::Delivered)
        .await
        .unwrap();
    state
        .lifecycle
        .update_status(&v2, &vo2_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(parent_of(&state, &vo1).await.status, OrderStatus::Delivered);

    // {cancelled, delivered} matches no rule -> pending
    state
        .lifecycle
        .update_status(&v1, &vo1_id, OrderStatus::Cancelled)
        .await
        .unwrap();
    assert_eq!(parent_of(&state, &vo1).await.status, OrderStatus::Pending);
}
