//! Catalog cleanup operations used by the admin tool
//!
//! The duplicate and dummy-row heuristics target one-off data problems and
//! are not part of any stable interface.

use super::models::Book;
use crate::Result;
use sqlx::{SqliteExecutor, SqlitePool};
use std::collections::HashMap;
use tracing::info;

/// Author name carried by generated placeholder rows
pub const DUMMY_AUTHOR: &str = "Expert Author";
/// Title marker carried by generated placeholder rows
pub const DUMMY_TITLE_MARKER: &str = "Vol ";

/// A book that duplicates another and the id it duplicates
#[derive(Debug, Clone, PartialEq)]
pub struct Duplicate {
    pub book: Book,
    pub kept_id: i64,
}

/// Books sharing title and author with a lower-id book
///
/// Matching is exact on both fields; the lowest id of each group is kept.
pub async fn find_duplicates(pool: &SqlitePool) -> Result<Vec<Duplicate>> {
    let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    let mut first_seen: HashMap<(String, String), i64> = HashMap::new();
    let mut duplicates = Vec::new();

    for book in books {
        let key = (book.title.clone(), book.author.clone());
        match first_seen.get(&key) {
            Some(&kept_id) => duplicates.push(Duplicate { book, kept_id }),
            None => {
                first_seen.insert(key, book.id);
            }
        }
    }

    Ok(duplicates)
}

/// Generated placeholder rows ("... Vol N" by "Expert Author")
pub async fn find_dummy_books(pool: &SqlitePool) -> Result<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>(
        "SELECT * FROM books WHERE author = ? AND instr(title, ?) > 0 ORDER BY id ASC",
    )
    .bind(DUMMY_AUTHOR)
    .bind(DUMMY_TITLE_MARKER)
    .fetch_all(pool)
    .await?;
    Ok(books)
}

/// Counts from a bulk delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub images: u64,
    pub summaries: u64,
    pub books: u64,
}

/// Delete books and everything hanging off them in one transaction
///
/// Order is summary images, then summaries, then books, so foreign keys hold
/// at every step.
pub async fn delete_books(pool: &SqlitePool, book_ids: &[i64]) -> Result<DeleteReport> {
    let mut report = DeleteReport::default();
    if book_ids.is_empty() {
        return Ok(report);
    }

    let mut tx = pool.begin().await?;

    for &book_id in book_ids {
        report.images += sqlx::query(
            "DELETE FROM summary_images WHERE summary_id IN (SELECT id FROM summaries WHERE book_id = ?)",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        report.summaries += sqlx::query("DELETE FROM summaries WHERE book_id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        report.books += sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    info!(
        "Deleted {} books, {} summaries, {} images",
        report.books, report.summaries, report.images
    );
    Ok(report)
}

/// Whether a cover URL already points at Google Books
pub fn has_google_cover(book: &Book) -> bool {
    book.cover_image_url
        .as_deref()
        .is_some_and(|url| url.contains("books.google.com"))
}

/// Replace a book's cover URL
pub async fn update_cover_url<'e, E>(executor: E, book_id: i64, url: &str) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "UPDATE books SET cover_image_url = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
    )
    .bind(url)
    .bind(book_id)
    .execute(executor)
    .await?;
    Ok(())
}

/// Row counts for the content report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentReport {
    pub genres: i64,
    pub books: i64,
    pub summaries: i64,
    pub books_without_summary: i64,
    pub books_without_cover: i64,
    pub featured: i64,
}

pub async fn content_report(pool: &SqlitePool) -> Result<ContentReport> {
    let count = |sql: &'static str| async move {
        let n: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        Ok::<i64, sqlx::Error>(n)
    };

    Ok(ContentReport {
        genres: count("SELECT COUNT(*) FROM genres").await?,
        books: count("SELECT COUNT(*) FROM books").await?,
        summaries: count("SELECT COUNT(*) FROM summaries").await?,
        books_without_summary: count(
            "SELECT COUNT(*) FROM books b LEFT JOIN summaries s ON s.book_id = b.id WHERE s.id IS NULL",
        )
        .await?,
        books_without_cover: count(
            "SELECT COUNT(*) FROM books WHERE cover_image_url IS NULL OR cover_image_url = ''",
        )
        .await?,
        featured: count("SELECT COUNT(*) FROM books WHERE is_featured = 1").await?,
    })
}
