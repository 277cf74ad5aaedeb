//! Shared test fixtures: a seeded temporary catalog and request helpers

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use bookwise_common::config::{AppConfig, CliOverrides, ImagesToml, TomlConfig};
use bookwise_common::db::seed::{seed_database, SeedBook, SeedCatalog, SeedGenre, SeedSummary};
use bookwise_common::db::{connect_readonly, init_database, Takeaway};
use bookwise_web::{build_router, AppState};
use serde_json::Value;
use tempfile::TempDir;

fn genre(name: &str, slug: &str) -> SeedGenre {
    SeedGenre {
        name: name.into(),
        slug: Some(slug.into()),
        ..Default::default()
    }
}

fn summary(overview: &str, rating: f64) -> SeedSummary {
    SeedSummary {
        overview_text: overview.into(),
        main_content: format!("{} In depth.", overview),
        key_takeaways: vec![Takeaway {
            title: "Focus".into(),
            text: "Attention is the scarce resource.".into(),
        }],
        rating,
        ..Default::default()
    }
}

/// Two genres, four books; `no-summary` has no summary
pub fn test_catalog() -> SeedCatalog {
    SeedCatalog {
        genres: vec![genre("Productivity", "a"), genre("Business", "b")],
        books: vec![
            SeedBook {
                title: "Atomic Habits".into(),
                author: "James Clear".into(),
                genre: "a".into(),
                publication_year: Some(2018),
                is_featured: true,
                summary: Some(summary("Small habits compound over time.", 4.8)),
                ..Default::default()
            },
            SeedBook {
                title: "Deep Work".into(),
                author: "Cal Newport".into(),
                genre: "a".into(),
                publication_year: Some(2016),
                summary: Some(summary("Focused work produces value.", 4.5)),
                ..Default::default()
            },
            SeedBook {
                title: "Zero to One".into(),
                author: "Peter Thiel".into(),
                genre: "b".into(),
                publication_year: Some(2014),
                summary: Some(summary("Build monopolies through innovation.", 4.2)),
                ..Default::default()
            },
            SeedBook {
                title: "No Summary".into(),
                author: "Anonymous".into(),
                genre: "b".into(),
                ..Default::default()
            },
        ],
    }
}

/// Seed a temp database, reopen it read-only and build the router
pub async fn setup_app() -> (TempDir, Router) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("bookwise.db");

    let pool = init_database(&db_path).await.expect("init database");
    seed_database(&pool, &test_catalog()).await.expect("seed");
    pool.close().await;

    let toml_config = TomlConfig {
        images: ImagesToml {
            verify: Some(false),
            timeout_secs: Some(1),
        },
        ..Default::default()
    };
    let cli = CliOverrides {
        database_path: Some(db_path.clone()),
        ..Default::default()
    };
    let config = AppConfig::from_sources(&cli, &toml_config, |_| None).expect("config");

    let db = connect_readonly(&db_path).await.expect("read-only pool");
    let state = AppState::new(db, config).expect("state");
    (dir, build_router(state))
}

pub fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// GET carrying a session cookie
pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// URL-encoded form POST, optionally carrying a session cookie
pub fn form_post(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}
