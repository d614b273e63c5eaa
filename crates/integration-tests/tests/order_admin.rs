//! Integration tests for order history and the admin order screen.

#![allow(clippy::unwrap_used)]

use uphaar_core::{OrderId, OrderRecord, OrderStatus, ProductId, ProfileRole, UserId};
use uphaar_integration_tests::TestContext;
use uphaar_storefront::error::AppError;
use uphaar_storefront::services::auth::AuthUser;
use uphaar_storefront::services::checkout::resolve_cart;
use uphaar_storefront::services::messaging::order_follow_up_link;
use uphaar_storefront::store::{Profile, StoreError};

fn admin_profile(id: &str) -> Profile {
    Profile {
        id: UserId::new(id),
        email: Some("ops@uphaar.in".to_string()),
        name: Some("Ops".to_string()),
        phone: None,
        role: Some(ProfileRole::Admin),
    }
}

async fn place(ctx: &TestContext, user: &str, product: &str, name: &str) -> OrderRecord {
    let mut commerce = ctx.state.load_commerce();
    commerce.clear_cart();
    commerce.add_to_cart(&ProductId::new(product), 1, None).unwrap();
    let summary = resolve_cart(commerce.cart(), ctx.state.resolver()).await;

    ctx.state
        .submitter()
        .place_order(&AuthUser::new(user), name, "9820000000", &summary)
        .unwrap()
        .persistence
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_history_lists_only_own_orders_newest_first() {
    let ctx = TestContext::new();
    let first = place(&ctx, "u1", "up-01", "Asha").await;
    place(&ctx, "u2", "ky-01", "Ravi").await;
    let second = place(&ctx, "u1", "up-02", "Asha").await;

    let orders = ctx.state.history().for_user(&UserId::new("u1")).await.unwrap();
    let ids: Vec<&OrderId> = orders.iter().map(|order| &order.id).collect();
    assert_eq!(ids, [&second.id, &first.id]);
}

#[tokio::test]
async fn test_non_admin_cannot_see_all_orders() {
    let ctx = TestContext::new();
    ctx.store.add_profile(Profile {
        role: Some(ProfileRole::User),
        ..admin_profile("u1")
    });
    place(&ctx, "u1", "up-01", "Asha").await;

    let as_user = ctx.state.history().all_orders(&UserId::new("u1")).await;
    assert!(matches!(as_user, Err(AppError::Forbidden(_))));

    let no_profile = ctx.state.history().all_orders(&UserId::new("stranger")).await;
    assert!(matches!(no_profile, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_admin_toggles_completion() {
    let ctx = TestContext::new();
    ctx.store.add_profile(admin_profile("admin"));
    place(&ctx, "u1", "up-01", "Asha").await;
    place(&ctx, "u2", "ky-01", "Ravi").await;

    let admin = UserId::new("admin");
    let all = ctx.state.history().all_orders(&admin).await.unwrap();
    assert_eq!(all.len(), 2);

    let order = &all[0];
    let completed = ctx.state.history().toggle_completed(&admin, order).await.unwrap();
    assert!(completed.status.is_completed());

    let reopened = ctx
        .state
        .history()
        .toggle_completed(&admin, &completed)
        .await
        .unwrap();
    assert_eq!(reopened.status, OrderStatus::placed());
}

#[tokio::test]
async fn test_admin_sets_free_form_status() {
    let ctx = TestContext::new();
    ctx.store.add_profile(admin_profile("admin"));
    let order = place(&ctx, "u1", "up-01", "Asha").await;

    let updated = ctx
        .state
        .history()
        .set_status(&UserId::new("admin"), &order.id, OrderStatus::new("shipped"))
        .await
        .unwrap();
    assert_eq!(updated.status.as_str(), "shipped");

    let missing = ctx
        .state
        .history()
        .set_status(&UserId::new("admin"), &OrderId::new("nope"), OrderStatus::completed())
        .await;
    assert!(matches!(missing, Err(AppError::Store(StoreError::NotFound(_)))));
}

#[tokio::test]
async fn test_follow_up_link_uses_short_order_id() {
    let ctx = TestContext::new();
    let order = place(&ctx, "u1", "up-01", "Asha").await;

    let link = order_follow_up_link(&order);
    let short: String = order.id.as_str().chars().take(8).collect();
    assert!(link.starts_with("https://wa.me/?text=Hi%20Asha%2C%20regarding%20your%20order%20%23"));
    assert!(link.contains(&short));
}
