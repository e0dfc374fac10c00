//! Integration tests for the admin API.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The admin server running (cargo run -p maison-admin)
//! - `MAISON_ADMIN_TOKEN` set to the access token of a user granted the
//!   admin role (`maison-cli admin grant <user-id>`)

use maison_integration_tests::{admin_base_url, admin_token};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Value, json};

fn authed(builder: RequestBuilder) -> RequestBuilder {
    let token = admin_token().expect("MAISON_ADMIN_TOKEN must be set");
    builder.bearer_auth(token)
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_routes_reject_anonymous() {
    let resp = Client::new()
        .get(format!("{}/products", admin_base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = resp.json().await.expect("Error body was not JSON");
    assert_eq!(body["error"], "sign in required");
}

#[tokio::test]
#[ignore = "Requires running admin server and admin token"]
async fn test_status_report() {
    let client = Client::new();
    let resp = authed(client.get(format!("{}/status", admin_base_url())))
        .send()
        .await
        .expect("Failed to get status");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Status was not JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["connected"], true);
    assert!(body["tables"]["products"].as_i64().is_some());
}

#[tokio::test]
#[ignore = "Requires running admin server and admin token"]
async fn test_category_lifecycle() {
    let client = Client::new();
    let base = admin_base_url();

    let resp = authed(client.post(format!("{base}/categories")))
        .json(&json!({ "name": "Integration Scarves", "showInMenu": false }))
        .send()
        .await
        .expect("Failed to create category");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("Category was not JSON");
    assert_eq!(created["slug"], "integration-scarves");
    let id = created["id"].as_i64().expect("category id");

    let duplicate = authed(client.post(format!("{base}/categories")))
        .json(&json!({ "name": "Integration Scarves" }))
        .send()
        .await
        .expect("Failed to send duplicate");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let deleted = authed(client.delete(format!("{base}/categories/{id}")))
        .send()
        .await
        .expect("Failed to delete category");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin token"]
async fn test_invalid_product_is_rejected() {
    let client = Client::new();
    let resp = authed(client.post(format!("{}/products", admin_base_url())))
        .json(&json!({ "name": "Leather Tote", "price": "300", "salePrice": "350" }))
        .send()
        .await
        .expect("Failed to send product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and admin token"]
async fn test_upload_rejects_wrong_type() {
    let client = Client::new();
    let boundary = "maison-integration";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.gif\"\r\n\
         Content-Type: image/gif\r\n\r\nGIF89a\r\n--{boundary}--\r\n"
    );
    let resp = authed(client.post(format!("{}/upload", admin_base_url())))
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(body)
        .send()
        .await
        .expect("Failed to send upload");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
