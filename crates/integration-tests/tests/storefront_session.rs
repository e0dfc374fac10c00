//! Integration tests for the session-backed cart and wishlist.
//!
//! These tests require:
//! - A migrated database with at least one published, in-stock product
//! - The storefront server running (cargo run -p maison-storefront)

use maison_integration_tests::{session_client, storefront_base_url};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

async fn first_product_id(client: &Client) -> i64 {
    let body: Value = client
        .get(format!("{}/products?inStock=true&limit=1", storefront_base_url()))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Listing was not JSON");
    body["items"][0]["id"]
        .as_i64()
        .expect("Seeded catalog has an in-stock product")
}

async fn post(client: &Client, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = client
        .post(format!("{}{path}", storefront_base_url()))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = resp.status();
    (status, resp.json().await.unwrap_or(Value::Null))
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_cart_survives_between_requests() {
    let client = session_client();
    let product_id = first_product_id(&client).await;

    let (status, added) = post(&client, "/cart/add", json!({ "productId": product_id, "quantity": 2 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(added["cart"]["count"], 2);
    assert_eq!(added["ui"]["cartDrawerOpen"], true);

    let count: Value = client
        .get(format!("{}/cart/count", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get count")
        .json()
        .await
        .expect("Count was not JSON");
    assert_eq!(count["count"], 2);

    let (status, cleared) = post(&client, "/cart/clear", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_separate_sessions_do_not_share_cart() {
    let alice = session_client();
    let bob = session_client();
    let product_id = first_product_id(&alice).await;

    post(&alice, "/cart/add", json!({ "productId": product_id })).await;

    let bob_cart: Value = bob
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get cart")
        .json()
        .await
        .expect("Cart was not JSON");
    assert_eq!(bob_cart["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded catalog"]
async fn test_wishlist_toggle_round_trip() {
    let client = session_client();
    let product_id = first_product_id(&client).await;

    let (_, first) = post(&client, "/wishlist/toggle", json!({ "productId": product_id })).await;
    assert_eq!(first["inWishlist"], true);

    let (_, second) = post(&client, "/wishlist/toggle", json!({ "productId": product_id })).await;
    assert_eq!(second["inWishlist"], false);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_account_requires_token() {
    let resp = session_client()
        .get(format!("{}/account/orders", storefront_base_url()))
        .send()
        .await
        .expect("Failed to get orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
