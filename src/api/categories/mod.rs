//! Category API Module

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/categories", get(handler::list).post(handler::create))
        .route(
            "/api/categories/{id}",
            put(handler::update).delete(handler::delete),
        )
}
