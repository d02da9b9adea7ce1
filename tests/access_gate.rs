//! Access gate: role and ownership rejections, evaluated against the
//! vendor and user tables rather than token claims.
//! Run: cargo test --test access_gate

mod common;

use bazaar_server::auth::{CurrentUser, gate};
use bazaar_server::db::repository::record_id;
use bazaar_server::utils::AppError;

fn caller(id: &str) -> CurrentUser {
    CurrentUser {
        id: id.to_string(),
        username: format!("user-{id}"),
    }
}

#[tokio::test]
async fn vendor_gate_requires_a_vendor_record() {
    let (_tmp, state) = common::test_state().await;
    common::seed_user(&state, "c1", "customer", false).await;
    common::seed_vendor(&state, "v1", "Vendor One").await;

    let err = gate::require_vendor(&state, &caller("c1")).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    let vendor = gate::require_vendor(&state, &caller("v1")).await.unwrap();
    assert_eq!(vendor.name, "Vendor One");
}

#[tokio::test]
async fn admin_gate_requires_the_admin_flag() {
    let (_tmp, state) = common::test_state().await;
    common::seed_user(&state, "c1", "customer", false).await;
    common::seed_user(&state, "a1", "admin", true).await;

    let err = gate::require_admin(&state, &caller("c1")).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    // Unknown callers are rejected too
    let err = gate::require_admin(&state, &caller("ghost")).await.unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));

    gate::require_admin(&state, &caller("a1")).await.unwrap();
}

#[tokio::test]
async fn vendor_or_admin_accepts_either_role() {
    let (_tmp, state) = common::test_state().await;
    common::seed_user(&state, "a1", "admin", true).await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    common::seed_user(&state, "c1", "customer", false).await;

    gate::require_vendor_or_admin(&state, &caller("a1")).await.unwrap();
    gate::require_vendor_or_admin(&state, &caller("v1")).await.unwrap();
    let err = gate::require_vendor_or_admin(&state, &caller("c1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
}

#[tokio::test]
async fn ownership_compares_the_vendor_link() {
    let v1 = record_id("vendor", "v1");
    gate::require_ownership(&caller("v1"), &v1).unwrap();

    let err = gate::require_ownership(&caller("v2"), &v1).unwrap_err();
    assert!(matches!(err, AppError::PermissionDenied(_)));
}
