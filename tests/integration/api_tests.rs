//! API integration tests against a running server

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000";

/// Client that leaves `303 See Other` answers for the test to inspect
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

async fn submit(client: &Client, path: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

fn location(response: &reqwest::Response) -> String {
    response.headers()["location"]
        .to_str()
        .expect("Location is not text")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = client();

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
async fn test_readiness_check() {
    let response = client()
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_catalog_home() {
    let response = client()
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["view"], "index");
    assert!(body["book_instance_available_count"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_genre_create_is_case_insensitive() {
    let client = client();
    let name = format!("Integration {}", uuid::Uuid::new_v4().simple());

    let first = submit(&client, "/catalog/genres/create", json!({ "name": name })).await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = submit(
        &client,
        "/catalog/genres/create",
        json!({ "name": name.to_uppercase() }),
    )
    .await;
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), location(&second));
}

#[tokio::test]
#[ignore]
async fn test_book_create_rejects_missing_fields() {
    let client = client();

    let response = submit(
        &client,
        "/catalog/books/create",
        json!({ "title": "Orphan", "author": "", "summary": "s", "isbn": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json().await.expect("Failed to parse response");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("No errors in response")
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert!(fields.contains(&"author"));
    assert!(fields.contains(&"isbn"));
    assert_eq!(body["book"]["title"], "Orphan");
}

#[tokio::test]
#[ignore]
async fn test_author_delete_blocked_by_books() {
    let client = client();

    let created = submit(
        &client,
        "/catalog/authors/create",
        json!({ "first_name": "Ursula", "family_name": "Le Guin", "date_of_birth": "1929-10-21" }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    let author_url = location(&created);
    let author_id = author_url.rsplit('/').next().expect("No id in url").to_string();

    let book = submit(
        &client,
        "/catalog/books/create",
        json!({
            "title": "The Dispossessed",
            "author": author_id,
            "summary": "An ambiguous utopia",
            "isbn": "9780061054884"
        }),
    )
    .await;
    assert_eq!(book.status(), StatusCode::SEE_OTHER);
    let book_url = location(&book);

    let blocked = submit(&client, &format!("{}/delete", author_url), json!({})).await;
    assert_eq!(blocked.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = blocked.json().await.expect("Failed to parse response");
    assert_eq!(body["author_books"].as_array().map(Vec::len), Some(1));

    let book_deleted = submit(&client, &format!("{}/delete", book_url), json!({})).await;
    assert_eq!(location(&book_deleted), "/catalog/books");

    let author_deleted = submit(&client, &format!("{}/delete", author_url), json!({})).await;
    assert_eq!(location(&author_deleted), "/catalog/authors");
}
