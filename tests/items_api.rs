//! End-to-end tests for the items API over a real TCP listener.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

async fn add(app: &common::TestApp, name: &str) -> String {
    let res = app
        .client
        .post(app.url("/api/items"))
        .json(&json!({ "item": name }))
        .send()
        .await
        .expect("API unreachable");
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_hello() {
    let app = common::spawn_app().await;
    let res = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Welcome to the Items API with MongoDB!");
}

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let app = common::spawn_app().await;

    let res = app
        .client
        .post(app.url("/api/items"))
        .json(&json!({ "item": "Test Item" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["message"], "Item added successfully");
    let id = created["id"].as_str().unwrap();

    let res = app
        .client
        .get(app.url(&format!("/api/items/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "_id": id, "name": "Test Item" }));
}

#[tokio::test]
async fn test_names_survive_round_trip() {
    let app = common::spawn_app().await;
    for name in ["a", "with spaces", "ünïcödé ✓", "{\"json\": true}", "0"] {
        let id = add(&app, name).await;
        let body: Value = app
            .client
            .get(app.url(&format!("/api/items/{id}")))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["name"], name);
    }
}

#[tokio::test]
async fn test_add_invalid_item() {
    let app = common::spawn_app().await;
    let res = app
        .client
        .post(app.url("/api/items"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid item" }));

    let items: Value = app
        .client
        .get(app.url("/api/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items, json!({ "items": [] }));
}

#[tokio::test]
async fn test_list_counts_created_items() {
    let app = common::spawn_app().await;

    let res = app.client.get(app.url("/api/items")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 0);

    for i in 1..=5 {
        add(&app, &format!("Item {i}")).await;
    }

    let body: Value = app
        .client
        .get(app.url("/api/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["name"], "Item 1");
    assert_eq!(items[4]["name"], "Item 5");
}

#[tokio::test]
async fn test_get_absent_item() {
    let app = common::spawn_app().await;
    let res = app
        .client
        .get(app.url("/api/items/000000000000000000000000"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Item not found" }));
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = common::spawn_app().await;
    for method in [reqwest::Method::GET, reqwest::Method::DELETE] {
        let res = app
            .client
            .request(method, app.url("/api/items/12345"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Invalid item id" }));
    }

    let res = app
        .client
        .put(app.url("/api/items/12345"))
        .json(&json!({ "item": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid item id" }));
}

#[tokio::test]
async fn test_update_item() {
    let app = common::spawn_app().await;
    let id = add(&app, "Test Item").await;
    let url = app.url(&format!("/api/items/{id}"));

    let res = app
        .client
        .put(&url)
        .json(&json!({ "item": "Updated Test Item" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Item updated successfully" }));

    let body: Value = app.client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["name"], "Updated Test Item");

    // Unchanged name still reports success.
    let res = app
        .client
        .put(&url)
        .json(&json!({ "item": "Updated Test Item" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_validation_precedes_existence() {
    let app = common::spawn_app().await;
    let absent = app.url("/api/items/000000000000000000000000");

    let res = app.client.put(&absent).json(&json!({})).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid item" }));

    let res = app
        .client
        .put(&absent)
        .json(&json!({ "item": "Updated Test Item" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Item not found" }));

    let id = add(&app, "Test Item").await;
    let res = app
        .client
        .put(app.url(&format!("/api/items/{id}")))
        .json(&json!({ "item": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice() {
    let app = common::spawn_app().await;
    let id = add(&app, "Test Item").await;
    let url = app.url(&format!("/api/items/{id}"));

    let res = app.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Item deleted successfully" }));

    let res = app.client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Item not found" }));

    let res = app.client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(app.store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = common::spawn_app().await;

    let res = app
        .client
        .get(app.url("/"))
        .header("x-request-id", "integration-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "integration-42");

    let res = app.client.get(app.url("/api/items")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = common::spawn_app().await;
    let res = app.client.get(app.url("/api/widgets")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
