//! Product API Handlers
//!
//! Every mutation requires a vendor account; update and delete additionally
//! require that the product belongs to the caller.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::auth::gate;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{CategoryRepository, ProductRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_non_negative_amount, validate_non_negative_stock,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// GET /api/products - full catalog listing
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_all().await?;
    Ok(ok(products))
}

/// GET /api/vendor/products - the caller's own products
pub async fn list_own(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    gate::require_vendor(&state, &user).await?;
    let repo = ProductRepository::new(state.get_db());
    let products = repo.find_by_vendor(&gate::vendor_id(&user)).await?;
    Ok(ok(products))
}

/// POST /api/products - create a product owned by the caller (vendor)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<AppResponse<Product>>> {
    gate::require_vendor(&state, &user).await?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_non_negative_amount(payload.price, "price")?;
    validate_non_negative_stock(payload.stock, "stock")?;

    let categories = CategoryRepository::new(state.get_db());
    if categories.find_by_id(&payload.category_id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Category {} not found",
            payload.category_id
        )));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(gate::vendor_id(&user), payload).await?;
    Ok(ok(product))
}

/// PUT /api/products/{id} - update an owned product (vendor)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<AppResponse<Product>>> {
    gate::require_vendor(&state, &user).await?;
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_non_negative_amount(price, "price")?;
    }
    if let Some(stock) = payload.stock {
        validate_non_negative_stock(stock, "stock")?;
    }

    let repo = ProductRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    gate::require_ownership(&user, &existing.vendor)?;

    if let Some(ref category_id) = payload.category_id {
        let categories = CategoryRepository::new(state.get_db());
        if categories.find_by_id(category_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Category {} not found",
                category_id
            )));
        }
    }

    let product = repo.update(&id, payload).await?;
    Ok(ok(product))
}

/// DELETE /api/products/{id} - delete an owned product (vendor)
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    gate::require_vendor(&state, &user).await?;
    let repo = ProductRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    gate::require_ownership(&user, &existing.vendor)?;

    repo.delete(&id).await?;
    Ok(ok(()))
}
