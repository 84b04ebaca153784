//! Integration tests for the admin deletion flow.
//!
//! Deletion is a confirmation page (GET) followed by a form post carrying
//! `confirm=yes` or `confirm=no`.

use partner_shops_integration_tests::{Options, TestContext, row_count, sample_shops};

#[tokio::test]
async fn test_admin_list_shows_delete_affordances() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    let body = ctx.get_text("/admin/shops").await;
    assert_eq!(row_count(&body), 3);
    assert!(body.contains("Mode Admin"));
    assert_eq!(body.matches("class=\"delete\"").count(), 3);
}

#[tokio::test]
async fn test_confirmation_page_names_the_shop() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    let body = ctx.get_text("/admin/shops/7/delete").await;
    assert!(body.contains("Voulez-vous vraiment supprimer la boutique"));
    assert!(body.contains("Boutique X"));
    assert!(body.contains("name=\"confirm\" value=\"yes\""));
    assert!(body.contains("name=\"confirm\" value=\"no\""));
    assert!(ctx.data_service.deleted().is_empty());
}

#[tokio::test]
async fn test_confirmation_for_unknown_shop_is_not_found() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    assert_eq!(ctx.get("/admin/shops/99/delete").await.status(), 404);
    assert_eq!(ctx.post_delete(99, "yes").await.status(), 404);
}

#[tokio::test]
async fn test_declined_delete_changes_nothing() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    let response = ctx.post_delete(7, "no").await;
    assert_eq!(response.status(), 303);
    assert_eq!(response.headers()["location"], "/admin/shops");

    assert!(ctx.data_service.deleted().is_empty());
    assert_eq!(ctx.data_service.len(), 3);

    let body = ctx.get_text("/admin/shops").await;
    assert_eq!(row_count(&body), 3);
    assert!(body.contains("Boutique X"));
}

#[tokio::test]
async fn test_accepted_delete_removes_exactly_that_shop() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    let response = ctx.post_delete(7, "yes").await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert_eq!(row_count(&body), 2);
    assert!(!body.contains("Boutique X"));
    assert!(body.contains("Boutique A"));
    assert!(body.contains("Boutique B"));
    assert!(!body.contains("Suppression..."));

    assert_eq!(ctx.data_service.deleted(), vec![7]);

    // The client cache was invalidated, so a fresh page agrees.
    let body = ctx.get_text("/admin/shops").await;
    assert_eq!(row_count(&body), 2);
}

#[tokio::test]
async fn test_failed_delete_keeps_list_and_shows_notice() {
    let ctx = TestContext::start(sample_shops(), Options::admin().failing_delete()).await;

    let response = ctx.post_delete(7, "yes").await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Erreur lors de la suppression."));
    assert_eq!(row_count(&body), 3);
    assert!(body.contains("Boutique X"));
    assert!(!body.contains("Suppression..."));

    assert!(ctx.data_service.deleted().is_empty());
}

#[tokio::test]
async fn test_admin_detail_and_contact() {
    let ctx = TestContext::start(sample_shops(), Options::admin()).await;

    let body = ctx.get_text("/admin/shops/3/detail").await;
    assert!(body.contains("Contact Direct"));

    let response = ctx.get("/admin/shops/3/contact").await;
    assert_eq!(response.status(), 303);
}
