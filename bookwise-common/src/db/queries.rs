//! Catalog queries
//!
//! All functions are read-only and return detached owned rows. Lookups that
//! may legitimately miss return `Ok(None)`.

use super::models::{Book, BookWithGenre, CatalogEntry, Genre, Summary, SummaryImage, SummaryRow};
use crate::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

const BOOK_COLUMNS: &str = "b.id, b.title, b.author, b.slug, b.cover_image_url, \
    b.cover_image_fallback, b.isbn, b.publication_year, b.genre_id, b.is_featured, \
    b.created_at, b.updated_at";

/// All genres ordered by name
pub async fn get_all_genres(pool: &SqlitePool) -> Result<Vec<Genre>> {
    let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name ASC")
        .fetch_all(pool)
        .await?;
    Ok(genres)
}

pub async fn get_genre_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(genre)
}

pub async fn get_genre_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(genre)
}

/// Books in the genre with the given slug, ordered by title
///
/// An unknown slug yields an empty list.
pub async fn get_books_by_genre(
    pool: &SqlitePool,
    genre_slug: &str,
    limit: Option<i64>,
) -> Result<Vec<Book>> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b JOIN genres g ON g.id = b.genre_id \
         WHERE g.slug = ? ORDER BY b.title ASC LIMIT ?"
    );
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(genre_slug)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;
    Ok(books)
}

/// Look up a book and its genre by slug
pub async fn get_book_by_slug(pool: &SqlitePool, slug: &str) -> Result<Option<BookWithGenre>> {
    let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE slug = ?")
        .bind(slug)
        .fetch_optional(pool)
        .await?;

    let Some(book) = book else {
        debug!("No book with slug {}", slug);
        return Ok(None);
    };

    // genre_id is a foreign key, so a missing genre only happens on a damaged file
    match get_genre_by_id(pool, book.genre_id).await? {
        Some(genre) => Ok(Some(BookWithGenre { book, genre })),
        None => Ok(None),
    }
}

pub async fn get_summary_for_book(pool: &SqlitePool, book_id: i64) -> Result<Option<Summary>> {
    let row = sqlx::query_as::<_, SummaryRow>("SELECT * FROM summaries WHERE book_id = ?")
        .bind(book_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Summary::from))
}

/// Images attached to a summary in display order
pub async fn get_images_for_summary(
    pool: &SqlitePool,
    summary_id: i64,
) -> Result<Vec<SummaryImage>> {
    let images = sqlx::query_as::<_, SummaryImage>(
        "SELECT * FROM summary_images WHERE summary_id = ? ORDER BY display_order ASC, id ASC",
    )
    .bind(summary_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}

pub async fn get_featured_books(pool: &SqlitePool, limit: i64) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE is_featured = 1 ORDER BY title ASC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Case-insensitive substring search over title and author
pub async fn search_books(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<Book>> {
    let pattern = format!("%{}%", escape_like(query.trim()));
    debug!("Searching books for {:?}", query);

    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT * FROM books
        WHERE title LIKE ?1 ESCAPE '\' OR author LIKE ?1 ESCAPE '\'
        ORDER BY title ASC
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Every book ordered by title
pub async fn get_all_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title ASC")
        .fetch_all(pool)
        .await?;
    Ok(books)
}

/// Books for the given slugs, in the order given; unknown slugs are skipped
pub async fn get_books_by_slugs(pool: &SqlitePool, slugs: &[&str]) -> Result<Vec<Book>> {
    let mut books = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE slug = ?")
            .bind(*slug)
            .fetch_optional(pool)
            .await?;
        if let Some(book) = book {
            books.push(book);
        }
    }
    Ok(books)
}

pub async fn get_books_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn get_genres_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn get_summaries_count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM summaries")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Books with a summary, best rated first
pub async fn get_top_rated_books(pool: &SqlitePool, limit: i64) -> Result<Vec<Book>> {
    let sql = format!(
        "SELECT {BOOK_COLUMNS} FROM books b JOIN summaries s ON s.book_id = b.id \
         ORDER BY s.rating DESC, b.title ASC LIMIT ?"
    );
    let books = sqlx::query_as::<_, Book>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(books)
}

/// Every genre with its number of books, ordered by name
pub async fn get_genre_book_counts(pool: &SqlitePool) -> Result<Vec<(Genre, i64)>> {
    let genres = get_all_genres(pool).await?;
    let counts: Vec<(i64, i64)> =
        sqlx::query_as("SELECT genre_id, COUNT(*) FROM books GROUP BY genre_id")
            .fetch_all(pool)
            .await?;
    let counts: HashMap<i64, i64> = counts.into_iter().collect();

    Ok(genres
        .into_iter()
        .map(|genre| {
            let count = counts.get(&genre.id).copied().unwrap_or(0);
            (genre, count)
        })
        .collect())
}

/// Distinct known publication years, newest first
pub async fn get_publication_years(pool: &SqlitePool) -> Result<Vec<i64>> {
    let years: Vec<i64> = sqlx::query_scalar(
        "SELECT DISTINCT publication_year FROM books \
         WHERE publication_year IS NOT NULL ORDER BY publication_year DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(years)
}

/// Load every book with its genre and decoded summary
pub async fn get_catalog(pool: &SqlitePool) -> Result<Vec<CatalogEntry>> {
    let books = get_all_books(pool).await?;
    let genres: HashMap<i64, Genre> = get_all_genres(pool)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let mut summaries: HashMap<i64, Summary> =
        sqlx::query_as::<_, SummaryRow>("SELECT * FROM summaries")
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|row| (row.book_id, Summary::from(row)))
            .collect();

    let entries: Vec<CatalogEntry> = books
        .into_iter()
        .filter_map(|book| {
            let genre = genres.get(&book.genre_id)?.clone();
            let summary = summaries.remove(&book.id);
            Some(CatalogEntry {
                book,
                genre,
                summary,
            })
        })
        .collect();

    debug!("Loaded catalog of {} books", entries.len());
    Ok(entries)
}
