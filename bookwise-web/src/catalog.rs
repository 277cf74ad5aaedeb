//! Cached catalog reads
//!
//! List queries behind every page are memoized for the configured TTL.
//! Single-row lookups go straight to the pool.

use bookwise_common::cache::TtlCache;
use bookwise_common::db::{queries, Book, CatalogEntry, Genre};
use bookwise_common::Result;
use sqlx::SqlitePool;
use std::time::Duration;

pub struct QueryCaches {
    genres: TtlCache<(), Vec<Genre>>,
    genre_counts: TtlCache<(), Vec<(Genre, i64)>>,
    books: TtlCache<(), Vec<Book>>,
    genre_books: TtlCache<String, Vec<Book>>,
    catalog: TtlCache<(), Vec<CatalogEntry>>,
}

impl QueryCaches {
    pub fn new(ttl: Duration) -> Self {
        Self {
            genres: TtlCache::new(ttl),
            genre_counts: TtlCache::new(ttl),
            books: TtlCache::new(ttl),
            genre_books: TtlCache::new(ttl),
            catalog: TtlCache::new(ttl),
        }
    }

    pub async fn genres(&self, db: &SqlitePool) -> Result<Vec<Genre>> {
        self.genres
            .get_or_try_insert_with((), || queries::get_all_genres(db))
            .await
    }

    pub async fn genre_counts(&self, db: &SqlitePool) -> Result<Vec<(Genre, i64)>> {
        self.genre_counts
            .get_or_try_insert_with((), || queries::get_genre_book_counts(db))
            .await
    }

    /// Every book, ordered by title
    pub async fn books(&self, db: &SqlitePool) -> Result<Vec<Book>> {
        self.books
            .get_or_try_insert_with((), || queries::get_all_books(db))
            .await
    }

    pub async fn books_in_genre(&self, db: &SqlitePool, slug: &str) -> Result<Vec<Book>> {
        self.genre_books
            .get_or_try_insert_with(slug.to_string(), || queries::get_books_by_genre(db, slug, None))
            .await
    }

    /// Books with genre and decoded summary, for recommendation scoring
    pub async fn catalog(&self, db: &SqlitePool) -> Result<Vec<CatalogEntry>> {
        self.catalog
            .get_or_try_insert_with((), || queries::get_catalog(db))
            .await
    }
}
