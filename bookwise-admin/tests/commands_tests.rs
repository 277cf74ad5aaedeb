//! Admin commands against temporary databases

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};
use bookwise_admin::commands;
use bookwise_admin::google_books::GoogleBooksClient;
use bookwise_admin::prompt::{AssumeYes, Confirm};
use bookwise_admin::DEFAULT_SEED;
use bookwise_common::db::maintenance::{content_report, DUMMY_AUTHOR};
use bookwise_common::db::queries;
use bookwise_common::db::seed::{seed_database, SeedBook, SeedCatalog, SeedGenre, SeedSummary};
use bookwise_common::db::init_database;
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Answers every question with "n"
struct Decline;

impl Confirm for Decline {
    fn confirm(&mut self, _question: &str) -> std::io::Result<bool> {
        Ok(false)
    }
}

async fn empty_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("admin.db")).await.unwrap();
    (dir, pool)
}

fn book(title: &str, slug: &str, author: &str) -> SeedBook {
    SeedBook {
        title: title.into(),
        author: author.into(),
        slug: Some(slug.into()),
        genre: "business".into(),
        summary: Some(SeedSummary::default()),
        ..Default::default()
    }
}

/// Catalog with one duplicate and one placeholder row
async fn messy_db() -> (TempDir, SqlitePool) {
    let (dir, pool) = empty_db().await;
    let catalog = SeedCatalog {
        genres: vec![SeedGenre {
            name: "Business".into(),
            ..Default::default()
        }],
        books: vec![
            book("Good to Great", "good-to-great", "Jim Collins"),
            book("Good to Great", "good-to-great-copy", "Jim Collins"),
            book("Leadership Vol 7", "leadership-vol-7", DUMMY_AUTHOR),
        ],
    };
    seed_database(&pool, &catalog).await.unwrap();
    (dir, pool)
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn test_bundled_seed_loads_and_reseeds() {
    let (_dir, pool) = empty_db().await;
    let catalog = SeedCatalog::from_json(DEFAULT_SEED).unwrap();
    let mut out = Vec::new();

    let first = commands::seed(&pool, &catalog, false, &mut out).await.unwrap();
    assert_eq!(first.genres_inserted, 7);
    assert_eq!(first.books_inserted, catalog.books.len());
    assert_eq!(first.summaries_inserted, catalog.books.len());

    // every book in the bundled catalog resolves by its slug
    assert!(queries::get_book_by_slug(&pool, "mans-search-for-meaning")
        .await
        .unwrap()
        .is_some());

    let again = commands::seed(&pool, &catalog, false, &mut out).await.unwrap();
    assert_eq!(again.books_inserted, 0);
    assert_eq!(again.books_skipped, catalog.books.len());

    let reset = commands::seed(&pool, &catalog, true, &mut out).await.unwrap();
    assert_eq!(reset.books_inserted, catalog.books.len());
    assert!(output(out).contains("Cleared existing catalog"));
}

#[tokio::test]
async fn test_dedupe_dry_run_then_delete() {
    let (_dir, pool) = messy_db().await;

    let mut out = Vec::new();
    let cancelled = commands::dedupe(&pool, &mut Decline, &mut out).await.unwrap();
    assert!(cancelled.is_none());
    let text = output(out);
    assert!(text.contains("Would delete"));
    assert!(text.contains("good-to-great-copy"));
    assert!(text.contains("Cancelled."));
    assert_eq!(content_report(&pool).await.unwrap().books, 3);

    let mut out = Vec::new();
    let report = commands::dedupe(&pool, &mut AssumeYes, &mut out)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.books, 1);
    assert_eq!(report.summaries, 1);
    assert!(queries::get_book_by_slug(&pool, "good-to-great").await.unwrap().is_some());
    assert!(queries::get_book_by_slug(&pool, "good-to-great-copy").await.unwrap().is_none());

    let mut out = Vec::new();
    assert!(commands::dedupe(&pool, &mut AssumeYes, &mut out).await.unwrap().is_none());
    assert!(output(out).contains("No duplicates found"));
}

#[tokio::test]
async fn test_remove_dummy() {
    let (_dir, pool) = messy_db().await;
    let mut out = Vec::new();

    let report = commands::remove_dummy(&pool, &mut AssumeYes, &mut out)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.books, 1);
    assert!(output(out).contains("Leadership Vol 7"));
    assert!(queries::get_book_by_slug(&pool, "leadership-vol-7").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sitemap_files_written() {
    let (_dir, pool) = messy_db().await;
    let out_dir = TempDir::new().unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    let mut out = Vec::new();

    let stats = commands::sitemap(&pool, out_dir.path(), "https://books.example.org", today, &mut out)
        .await
        .unwrap();
    assert_eq!(stats.total_urls, 5 + 1 + 3);

    let xml = std::fs::read_to_string(out_dir.path().join("sitemap.xml")).unwrap();
    assert!(xml.contains("<loc>https://books.example.org/book?slug=good-to-great</loc>"));
    assert!(xml.contains("<lastmod>2026-01-15</lastmod>"));

    let robots = std::fs::read_to_string(out_dir.path().join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://books.example.org/sitemap.xml"));
}

#[tokio::test]
async fn test_report_counts() {
    let (_dir, pool) = messy_db().await;
    let mut out = Vec::new();

    let report = commands::report(&pool, &mut out).await.unwrap();
    assert_eq!(report.books, 3);
    assert_eq!(report.genres, 1);
    assert_eq!(report.books_without_cover, 3);
    assert!(output(out).contains("Books per genre"));
}

async fn volumes(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let q = params.get("q").cloned().unwrap_or_default();
    if q.contains("Atomic Habits") {
        Json(json!({
            "totalItems": 1,
            "items": [{ "volumeInfo": { "imageLinks": {
                "smallThumbnail": "http://books.google.com/books/content?id=ah&zoom=5",
                "thumbnail": "http://books.google.com/books/content?id=ah&zoom=1&source=gbs_api"
            }}}]
        }))
    } else {
        Json(json!({ "totalItems": 0 }))
    }
}

async fn spawn_google_stub() -> String {
    let app = Router::new().route("/books/v1/volumes", get(volumes));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });
    format!("http://{}/books/v1", addr)
}

#[tokio::test]
async fn test_refresh_covers_against_stub() {
    let (_dir, pool) = empty_db().await;
    let catalog = SeedCatalog::from_json(DEFAULT_SEED).unwrap();
    seed_database(&pool, &catalog).await.unwrap();

    let base_url = spawn_google_stub().await;
    let client = GoogleBooksClient::with_base_url(&base_url, Duration::ZERO).unwrap();
    let mut out = Vec::new();

    let report = commands::refresh_covers(&pool, &client, &mut AssumeYes, &mut out)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.total, catalog.books.len());
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, catalog.books.len() - 1);
    assert!(output(out).contains("Progress saved"));

    let found = queries::get_book_by_slug(&pool, "atomic-habits").await.unwrap().unwrap();
    assert_eq!(
        found.book.cover_image_url.as_deref(),
        Some("https://books.google.com/books/content?id=ah&zoom=2&source=gbs_api")
    );

    // a second run skips the book that now has a Google cover
    let mut out = Vec::new();
    let second = commands::refresh_covers(&pool, &client, &mut AssumeYes, &mut out)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.skipped, 1);
    assert_eq!(second.updated, 0);
}

#[tokio::test]
async fn test_refresh_covers_cancelled_touches_nothing() {
    let (_dir, pool) = messy_db().await;
    let client = GoogleBooksClient::with_base_url("http://127.0.0.1:9", Duration::ZERO).unwrap();
    let mut out = Vec::new();

    let result = commands::refresh_covers(&pool, &client, &mut Decline, &mut out)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(output(out).contains("3 books, 3 without a Google Books cover"));
}
