//! Order API Module
//!
//! Customer-facing checkout/history routes plus the vendor-facing
//! sub-order routes.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/orders",
            post(handler::create).get(handler::list_customer_orders),
        )
        .route("/api/vendor/orders", get(handler::list_vendor_orders))
        .route(
            "/api/vendor/orders/{id}/status",
            put(handler::update_status),
        )
}
