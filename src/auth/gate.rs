//! Access Control Gate
//!
//! Role and ownership checks evaluated at the top of every mutating
//! handler, before any read or write of the protected resource. Rejection
//! has no side effects.
//!
//! | Check | Rule |
//! |-------|------|
//! | vendor | a `vendor` record exists for the caller's id |
//! | admin | the caller's `user` record carries the admin flag |
//! | ownership | the resource's `vendor` link equals the caller's vendor id |

use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Vendor;
use crate::db::repository::{UserRepository, VendorRepository, record_id};
use crate::security_log;
use crate::utils::{AppError, AppResult};

/// The caller's vendor record id
pub fn vendor_id(user: &CurrentUser) -> RecordId {
    record_id("vendor", &user.id)
}

/// Require that the caller is a registered vendor
pub async fn require_vendor(state: &ServerState, user: &CurrentUser) -> AppResult<Vendor> {
    let repo = VendorRepository::new(state.get_db());
    let vendor = repo.find_by_id(&user.id).await?;
    match vendor {
        Some(v) => Ok(v),
        None => {
            security_log!(
                "WARN",
                "vendor_required",
                user_id = user.id.clone(),
                username = user.username.clone()
            );
            Err(AppError::permission_denied("Vendor account required"))
        }
    }
}

/// Require that the caller is an administrator
pub async fn require_admin(state: &ServerState, user: &CurrentUser) -> AppResult<()> {
    let repo = UserRepository::new(state.get_db());
    let record = repo.find_by_id(&user.id).await?;
    if record.map(|u| u.is_admin).unwrap_or(false) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "admin_required",
        user_id = user.id.clone(),
        username = user.username.clone()
    );
    Err(AppError::permission_denied("Administrator role required"))
}

/// Require vendor or admin (read access to the category list)
pub async fn require_vendor_or_admin(state: &ServerState, user: &CurrentUser) -> AppResult<()> {
    if require_vendor(state, user).await.is_ok() {
        return Ok(());
    }
    require_admin(state, user)
        .await
        .map_err(|_| AppError::permission_denied("Vendor or administrator role required"))
}

/// Require that a vendor-linked resource belongs to the caller
pub fn require_ownership(user: &CurrentUser, resource_vendor: &RecordId) -> AppResult<()> {
    if *resource_vendor == vendor_id(user) {
        return Ok(());
    }
    security_log!(
        "WARN",
        "ownership_denied",
        user_id = user.id.clone(),
        resource_vendor = resource_vendor.to_string()
    );
    Err(AppError::permission_denied(
        "Resource belongs to another vendor",
    ))
}
