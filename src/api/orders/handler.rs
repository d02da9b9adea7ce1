//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::auth::gate;
use crate::core::ServerState;
use crate::db::models::{CreateOrderRequest, CreatedOrder, Order, UpdateStatusRequest, VendorOrder};
use crate::db::repository::{OrderRepository, record_id};
use crate::utils::{AppResponse, AppResult, ok};

/// POST /api/orders - checkout the submitted cart
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<AppResponse<CreatedOrder>>> {
    let created = state
        .lifecycle
        .create_order(record_id("user", &user.id), payload)
        .await?;
    Ok(ok(created))
}

/// GET /api/orders - the caller's parent orders, newest first
pub async fn list_customer_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_user(&user.id).await?;
    Ok(ok(orders))
}

/// GET /api/vendor/orders - the caller's vendor orders, newest first
pub async fn list_vendor_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<VendorOrder>>>> {
    gate::require_vendor(&state, &user).await?;
    let repo = OrderRepository::new(state.get_db());
    let orders = repo.find_by_vendor(&gate::vendor_id(&user)).await?;
    Ok(ok(orders))
}

/// PUT /api/vendor/orders/{id}/status - vendor status transition
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<AppResponse<VendorOrder>>> {
    gate::require_vendor(&state, &user).await?;
    let updated = state
        .lifecycle
        .update_status(&gate::vendor_id(&user), &id, payload.status)
        .await?;
    Ok(ok(updated))
}
