//! Query layer tests against a seeded temporary database

use bookwise_common::db::init_database;
use bookwise_common::db::queries;
use bookwise_common::db::seed::{seed_database, SeedBook, SeedCatalog, SeedGenre, SeedSummary};
use sqlx::SqlitePool;
use tempfile::TempDir;

fn genre(name: &str, slug: &str) -> SeedGenre {
    SeedGenre {
        name: name.into(),
        slug: Some(slug.into()),
        ..Default::default()
    }
}

fn book(title: &str, author: &str, genre: &str, year: i64, rating: f64) -> SeedBook {
    SeedBook {
        title: title.into(),
        author: author.into(),
        genre: genre.into(),
        publication_year: Some(year),
        summary: Some(SeedSummary {
            overview_text: format!("{} overview", title),
            rating,
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Two genres, three books: two in "a", one in "b"
async fn setup_small() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("catalog.db")).await.unwrap();

    let catalog = SeedCatalog {
        genres: vec![genre("Genre A", "a"), genre("Genre B", "b")],
        books: vec![
            book("Atomic Habits", "James Clear", "a", 2018, 4.8),
            book("Deep Work", "Cal Newport", "a", 2016, 4.5),
            book("Zero to One", "Peter Thiel", "b", 2014, 4.2),
        ],
    };
    seed_database(&pool, &catalog).await.unwrap();
    (dir, pool)
}

#[tokio::test]
async fn test_seeded_counts() {
    let (_dir, pool) = setup_small().await;

    assert_eq!(queries::get_books_by_genre(&pool, "a", None).await.unwrap().len(), 2);
    assert_eq!(queries::get_genres_count(&pool).await.unwrap(), 2);
    assert_eq!(queries::get_books_count(&pool).await.unwrap(), 3);
    assert_eq!(queries::get_summaries_count(&pool).await.unwrap(), 3);
}

#[tokio::test]
async fn test_books_by_genre_only_returns_that_genre() {
    let (_dir, pool) = setup_small().await;

    for g in queries::get_all_genres(&pool).await.unwrap() {
        let books = queries::get_books_by_genre(&pool, &g.slug, None).await.unwrap();
        assert!(books.iter().all(|b| b.genre_id == g.id), "genre {}", g.slug);
    }

    assert!(queries::get_books_by_genre(&pool, "missing", None)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(
        queries::get_books_by_genre(&pool, "a", Some(1)).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_book_by_slug() {
    let (_dir, pool) = setup_small().await;

    for b in queries::get_all_books(&pool).await.unwrap() {
        let found = queries::get_book_by_slug(&pool, &b.slug).await.unwrap().unwrap();
        assert_eq!(found.book.slug, b.slug);
        assert_eq!(found.genre.id, b.genre_id);
    }

    assert!(queries::get_book_by_slug(&pool, "no-such-book")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let (_dir, pool) = setup_small().await;

    for query in ["habit", "HABIT", "newport", "o"] {
        let results = queries::search_books(&pool, query, 20).await.unwrap();
        let needle = query.to_lowercase();
        assert!(!results.is_empty(), "query {}", query);
        assert!(results.iter().all(|b| b.title.to_lowercase().contains(&needle)
            || b.author.to_lowercase().contains(&needle)));
    }

    assert_eq!(queries::search_books(&pool, "o", 1).await.unwrap().len(), 1);
    assert!(queries::search_books(&pool, "%", 20).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_top_rated_and_years() {
    let (_dir, pool) = setup_small().await;

    let top = queries::get_top_rated_books(&pool, 2).await.unwrap();
    assert_eq!(
        top.iter().map(|b| b.slug.as_str()).collect::<Vec<_>>(),
        vec!["atomic-habits", "deep-work"]
    );

    assert_eq!(
        queries::get_publication_years(&pool).await.unwrap(),
        vec![2018, 2016, 2014]
    );
}

#[tokio::test]
async fn test_genre_counts_and_catalog() {
    let (_dir, pool) = setup_small().await;

    let counts: Vec<(String, i64)> = queries::get_genre_book_counts(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|(g, n)| (g.slug, n))
        .collect();
    assert_eq!(counts, vec![("a".to_string(), 2), ("b".to_string(), 1)]);

    let catalog = queries::get_catalog(&pool).await.unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(catalog.iter().all(|e| e.summary.is_some()));
    assert!(catalog.iter().all(|e| e.genre.id == e.book.genre_id));
}

#[tokio::test]
async fn test_books_by_slugs_keeps_order_and_skips_unknown() {
    let (_dir, pool) = setup_small().await;

    let books = queries::get_books_by_slugs(&pool, &["zero-to-one", "missing", "deep-work"])
        .await
        .unwrap();
    assert_eq!(
        books.iter().map(|b| b.slug.as_str()).collect::<Vec<_>>(),
        vec!["zero-to-one", "deep-work"]
    );
}
