//! Integration tests for the JSON API, health and build info

mod common;

use axum::http::StatusCode;
use common::{extract_json, setup_app, test_request};
use tower::util::ServiceExt; // for `oneshot`

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "bookwise-web");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(test_request("GET", "/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_profile"].is_string());
}

#[tokio::test]
async fn test_api_does_not_issue_session_cookie() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(test_request("GET", "/api/genres")).await.unwrap();
    assert!(response.headers().get("set-cookie").is_none());
}

#[tokio::test]
async fn test_get_book_with_summary() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(test_request("GET", "/api/books/deep-work"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["book"]["slug"], "deep-work");
    assert_eq!(body["genre"]["slug"], "a");
    assert_eq!(body["summary"]["key_takeaways"][0]["title"], "Focus");
    assert!(body["images"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_book_without_summary() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(test_request("GET", "/api/books/no-summary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert!(body["summary"].is_null());
}

#[tokio::test]
async fn test_unknown_book_is_json_404() {
    let (_dir, app) = setup_app().await;

    let response = app
        .oneshot(test_request("GET", "/api/books/nope"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body["error"]["message"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_search() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/search?q=HABIT"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["slug"], "atomic-habits");

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/search?q=o&limit=2"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let response = app
        .oneshot(test_request("GET", "/api/search?q=%20"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_recommendations_skip_current_and_prefer_genre() {
    let (_dir, app) = setup_app().await;

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/books/atomic-habits/recommendations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert!(!recs.is_empty());
    assert!(recs.iter().all(|r| r["book"]["slug"] != "atomic-habits"));
    assert!(recs.iter().all(|r| r["score"].as_f64().unwrap() > 0.0));
    assert_eq!(recs[0]["book"]["slug"], "deep-work");
    assert_eq!(recs[0]["reasons"][0], "Same genre: Productivity");

    let response = app
        .oneshot(test_request("GET", "/api/books/nope/recommendations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_genres_with_counts() {
    let (_dir, app) = setup_app().await;

    let response = app.oneshot(test_request("GET", "/api/genres")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let genres = body.as_array().unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0]["slug"], "b");
    assert_eq!(genres[0]["book_count"], 2);
    assert_eq!(genres[1]["slug"], "a");
    assert_eq!(genres[1]["book_count"], 2);
}
