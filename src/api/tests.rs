//! End-to-end tests for the HTTP surface.

use super::*;
use crate::config::AppConfig;
use crate::notify::Notifier;
use crate::notify::testing::{FlakyTransport, RecordingTransport, fast_policy};
use crate::storage::{Database, Review};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn test_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.create_schema().await.unwrap();
    db.seed_catalog().await.unwrap();
    db
}

fn state_with(db: Database, notifier: Notifier) -> AppState {
    let mut config = AppConfig::default();
    config.site.owner_whatsapp = Some("918500000000".into());
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").into();
    AppState {
        db,
        notifier,
        config: Arc::new(config),
    }
}

async fn create_test_app() -> (Router, Database) {
    let db = test_db().await;
    let app = router(state_with(db.clone(), Notifier::disabled()));
    (app, db)
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

// =========================================================================
// Catalog & Search
// =========================================================================

#[tokio::test]
async fn test_foods_are_listed_by_name() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/foods").await;
    assert_eq!(response.status(), StatusCode::OK);

    let foods = body_json(response).await;
    let foods = foods.as_array().unwrap();
    assert_eq!(foods.len(), 9);
    assert_eq!(foods[0]["name"], "Biryani");
    assert_eq!(foods[0]["category"], "Non-Veg");
    assert_eq!(foods[0]["price"], 200);
    assert_eq!(foods[0]["image"], "biryani.jpg");
    assert!(foods[0]["id"].is_i64());
}

#[tokio::test]
async fn test_search_partial_name() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/search?q=biryan").await;
    assert_eq!(response.status(), StatusCode::OK);

    let names: Vec<String> = serde_json::from_value(body_json(response).await).unwrap();
    assert!(names.contains(&"Biryani".to_string()));
    assert!(names.contains(&"Veg Biryani".to_string()));
    assert!(names.len() <= 8);
}

#[tokio::test]
async fn test_search_exact_name_comes_first() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/api/search?q=Chicken%20Curry").await;
    let names: Vec<String> = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(names[0], "Chicken Curry");
}

#[tokio::test]
async fn test_empty_search_skips_store() {
    let (app, db) = create_test_app().await;
    db.execute_raw("DROP TABLE reviews; DROP TABLE foods;")
        .await
        .unwrap();

    for uri in ["/api/search", "/api/search?q=", "/api/search?q=%20%20"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    // A real query has to hit the store, which is now broken
    let response = get(&app, "/api/search?q=curry").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"ok": false, "error": "Internal server error"})
    );
}

// =========================================================================
// Reviews
// =========================================================================

#[tokio::test]
async fn test_out_of_range_rating_is_rejected() {
    let (app, db) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/submit_review",
        json!({"name": "Ann", "rating": 6, "comment": "great"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"ok": false, "error": "Invalid review data"})
    );

    for rating in [json!(0), json!(-3), json!("abc"), json!(null)] {
        let response = post_json(
            &app,
            "/api/submit_review",
            json!({"rating": rating, "comment": "great"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(db.count_reviews().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let (app, db) = create_test_app().await;

    for rating in 1..=5 {
        let response = post_json(
            &app,
            "/api/submit_review",
            json!({"name": "Ann", "rating": rating, "comment": "   "}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
    assert_eq!(db.count_reviews().await.unwrap(), 0);
}

#[tokio::test]
async fn test_review_for_unknown_food_is_kept_without_food() {
    let (app, db) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/submit_review",
        json!({"name": "Ann", "rating": 4, "comment": "good", "food_id": 404}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    let reviews = db.list_reviews(None).await.unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].food_id, None);
    assert_eq!(reviews[0].comment, "good");
}

#[tokio::test]
async fn test_review_succeeds_when_mail_fails() {
    let db = test_db().await;
    let transport = FlakyTransport::always_failing();
    let (notifier, worker) = Notifier::spawn(transport.clone(), fast_policy(2), 8);
    let app = router(state_with(db.clone(), notifier));

    let response = post_json(
        &app,
        "/api/submit_review",
        json!({"name": "Ann", "rating": "5", "comment": "Superb", "food_id": "1"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));
    assert_eq!(db.count_reviews().await.unwrap(), 1);

    // Let the worker exhaust its retries
    drop(app);
    assert_eq!(worker.drain(Duration::from_secs(5)).await, 0);
    assert_eq!(
        transport.attempts.load(std::sync::atomic::Ordering::SeqCst),
        2
    );
}

#[tokio::test]
async fn test_review_notifies_owner() {
    let db = test_db().await;
    let transport = RecordingTransport::default();
    let (notifier, worker) = Notifier::spawn(transport.clone(), fast_policy(1), 8);
    let app = router(state_with(db, notifier));

    let response = post_json(
        &app,
        "/api/submit_review",
        json!({"rating": 3, "comment": "Decent"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    drop(app);
    assert_eq!(worker.drain(Duration::from_secs(5)).await, 0);
    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New Feedback — 3/5 from Anonymous");
}

#[tokio::test]
async fn test_reviews_listing_and_filter() {
    let (app, _) = create_test_app().await;

    for (food_id, comment) in [(json!(1), "first"), (json!(2), "second"), (json!(1), "third")] {
        let response = post_json(
            &app,
            "/api/submit_review",
            json!({"name": "Ann", "rating": 4, "comment": comment, "food_id": food_id}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(&app, "/api/reviews").await;
    assert_eq!(response.status(), StatusCode::OK);
    let all: Vec<Review> = serde_json::from_value(body_json(response).await).unwrap();
    let comments: Vec<&str> = all.iter().map(|r| r.comment.as_str()).collect();
    assert_eq!(comments, vec!["third", "second", "first"]);

    let response = get(&app, "/api/reviews?food_id=1").await;
    let filtered = body_json(response).await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r["food_id"] == 1));
    assert!(filtered[0]["created_at"].as_str().unwrap().contains('T'));

    let response = get(&app, "/api/reviews?food_id=junk").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);
}

// =========================================================================
// Contact & Bulk
// =========================================================================

#[tokio::test]
async fn test_contact_requires_all_fields() {
    let (app, db) = create_test_app().await;

    for body in [
        json!({"name": "", "email": "a@b.c", "message": "hi"}),
        json!({"name": "Ann", "email": " ", "message": "hi"}),
        json!({"name": "Ann", "email": "a@b.c"}),
    ] {
        let response = post_json(&app, "/api/contact", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"ok": false, "error": "Missing fields"})
        );
    }

    let response = post_json(
        &app,
        "/api/contact",
        json!({"name": "Ann", "email": "a@b.c", "message": " Do you cater? "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = db.get_contact(1).await.unwrap().unwrap();
    assert_eq!(stored.message, "Do you cater?");
    assert!(db.get_contact(2).await.unwrap().is_none());
}

#[tokio::test]
async fn test_bulk_requires_all_fields() {
    let (app, db) = create_test_app().await;

    let response = post_json(
        &app,
        "/api/bulk",
        json!({"name": "Bob", "email": "bob@example.com", "purpose": ""}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(db.get_bulk_request(1).await.unwrap().is_none());

    let response = post_json(
        &app,
        "/api/bulk",
        json!({"name": "Bob", "email": "bob@example.com", "purpose": "Wedding, 200 plates"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    let stored = db.get_bulk_request(1).await.unwrap().unwrap();
    assert_eq!(stored.name, "Bob");
    assert_eq!(stored.purpose, "Wedding, 200 plates");
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let (app, _) = create_test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/contact")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["ok"], false);
}

// =========================================================================
// Orders
// =========================================================================

#[tokio::test]
async fn test_order_requires_address() {
    let (app, db) = create_test_app().await;

    let response = post_json(&app, "/submit_order", json!({"address": "   "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"ok": false, "error": "Address is required"})
    );
    assert!(db.get_order(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_order_is_stored_when_mail_fails() {
    let db = test_db().await;
    let (notifier, _worker) =
        Notifier::spawn(FlakyTransport::always_failing(), fast_policy(3), 8);
    let app = router(state_with(db.clone(), notifier));

    let response = post_json(&app, "/submit_order", json!({"address": "12 Main St, Chennai"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"ok": true}));

    let order = db.get_order(1).await.unwrap().unwrap();
    assert_eq!(order.address, "12 Main St, Chennai");
}

// =========================================================================
// Pages & Health
// =========================================================================

#[tokio::test]
async fn test_home_page_lists_foods() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Mutton Curry"));
    assert!(html.contains("Parotta &amp; Fish Fry"));
}

#[tokio::test]
async fn test_static_pages_render() {
    let (app, _) = create_test_app().await;

    for uri in [
        "/categories",
        "/feedback",
        "/bulk",
        "/enter_address",
        "/order_confirmed",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }

    let html = body_text(get(&app, "/bulk").await).await;
    assert!(html.contains("https://wa.me/918500000000"));
}

#[tokio::test]
async fn test_page_assets_are_served() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/static/script.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let script = body_text(response).await;
    for route in ["/api/contact", "/api/bulk", "/submit_order", "/api/submit_review"] {
        assert!(script.contains(route), "{route}");
    }

    let response = get(&app, "/static/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app().await;

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_foods, 9);
    assert_eq!(health.total_reviews, 0);
}
