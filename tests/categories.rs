//! Category CRUD invariants: name uniqueness and the delete guard.
//! Run: cargo test --test categories

mod common;

use bazaar_server::db::models::{CategoryCreate, CategoryUpdate};
use bazaar_server::db::repository::{CategoryRepository, ProductRepository, RepoError};

fn create(name: &str) -> CategoryCreate {
    CategoryCreate {
        name: name.to_string(),
        description: None,
        image_url: None,
    }
}

#[tokio::test]
async fn duplicate_names_are_rejected() {
    let (_tmp, state) = common::test_state().await;
    let repo = CategoryRepository::new(state.get_db());

    repo.create(create("Coffee")).await.unwrap();
    let err = repo.create(create("Coffee")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Case-sensitive exact match only
    repo.create(create("coffee")).await.unwrap();
}

#[tokio::test]
async fn rename_checks_uniqueness_excluding_self() {
    let (_tmp, state) = common::test_state().await;
    let repo = CategoryRepository::new(state.get_db());

    let coffee = repo.create(create("Coffee")).await.unwrap();
    repo.create(create("Tea")).await.unwrap();
    let coffee_id = coffee.id.unwrap().key().to_string();

    // Renaming to a name held by a different category fails
    let err = repo
        .update(
            &coffee_id,
            CategoryUpdate {
                name: Some("Tea".to_string()),
                description: None,
                image_url: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Renaming to the current name succeeds
    let updated = repo
        .update(
            &coffee_id,
            CategoryUpdate {
                name: Some("Coffee".to_string()),
                description: Some("Beans and grounds".to_string()),
                image_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Coffee");
    assert_eq!(updated.description.as_deref(), Some("Beans and grounds"));
}

#[tokio::test]
async fn update_of_missing_category_is_not_found() {
    let (_tmp, state) = common::test_state().await;
    let repo = CategoryRepository::new(state.get_db());
    let err = repo
        .update(
            "missing",
            CategoryUpdate {
                name: Some("X".to_string()),
                description: None,
                image_url: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn delete_guard_blocks_referenced_categories() {
    let (_tmp, state) = common::test_state().await;
    common::seed_vendor(&state, "v1", "Vendor One").await;
    let cat_id = common::seed_category(&state, "Coffee").await;
    let product_id = common::seed_product(&state, "v1", &cat_id, "Beans", 500, 10).await;

    let repo = CategoryRepository::new(state.get_db());
    let err = repo.delete(&cat_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Precondition(_)));

    // Both category and product are untouched
    assert!(repo.find_by_id(&cat_id).await.unwrap().is_some());
    let products = ProductRepository::new(state.get_db());
    assert!(products.find_by_id(&product_id).await.unwrap().is_some());

    // Once the product is gone, the delete goes through
    products.delete(&product_id).await.unwrap();
    repo.delete(&cat_id).await.unwrap();
    assert!(repo.find_by_id(&cat_id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_of_missing_category_is_not_found() {
    let (_tmp, state) = common::test_state().await;
    let repo = CategoryRepository::new(state.get_db());
    let err = repo.delete("missing").await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
