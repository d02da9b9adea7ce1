//! Product API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products", post(handler::create).get(handler::list))
        .route(
            "/api/products/{id}",
            put(handler::update).delete(handler::delete),
        )
        .route("/api/vendor/products", get(handler::list_own))
}
