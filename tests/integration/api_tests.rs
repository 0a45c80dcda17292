//! API integration tests against a running server
//!
//! Requires the server on `localhost:7000` with a seeded database.
//! Run with: cargo test --test api_tests -- --ignored

use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "http://localhost:7000";

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_search_unknown_city() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/restaurant/search/no-such-city-anywhere", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["pagination"]["pages"], 1);
}

#[tokio::test]
#[ignore]
async fn test_search_then_fetch_restaurant() {
    let client = Client::new();
    let city = std::env::var("EATS_TEST_CITY").unwrap_or_else(|_| "London".to_string());

    let response = client
        .get(format!("{}/api/restaurant/search/{}?page=1", BASE_URL, city))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].as_array().expect("No data array").len() <= 10);
    let id = body["data"][0]["_id"].as_str().expect("No restaurant id");

    let response = client
        .get(format!("{}/api/restaurant/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let restaurant: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(restaurant["_id"], id);
}

#[tokio::test]
#[ignore]
async fn test_malformed_restaurant_id() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/restaurant/not-an-id", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Restaurant not found");
}

#[tokio::test]
#[ignore]
async fn test_current_user_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/api/my/user", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}
