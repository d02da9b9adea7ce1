//! Category API Handlers
//!
//! Listing is open to vendors and admins; every mutation is admin-only.
//! Gate checks run before any read or write so a rejected request has no
//! side effects.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::auth::gate;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppResponse, AppResult, ok};

/// GET /api/categories - all categories (vendor or admin)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    gate::require_vendor_or_admin(&state, &user).await?;
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(ok(categories))
}

/// POST /api/categories - create a category (admin)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<AppResponse<Category>>> {
    gate::require_admin(&state, &user).await?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(ok(category))
}

/// PUT /api/categories/{id} - update a category (admin)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<AppResponse<Category>>> {
    gate::require_admin(&state, &user).await?;
    if let Some(ref name) = payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.image_url, "imageUrl", MAX_URL_LEN)?;

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(ok(category))
}

/// DELETE /api/categories/{id} - delete a category (admin)
///
/// Rejected while any product still references the category.
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    gate::require_admin(&state, &user).await?;
    let repo = CategoryRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(ok(()))
}
