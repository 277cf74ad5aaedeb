//! Seed file loading
//!
//! A seed file is a JSON document with a `genres` array and a `books` array.
//! Books name their genre by slug and may carry a nested summary.

use super::models::{Analogy, Takeaway};
use crate::text_utils::slugify;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub genres: Vec<SeedGenre>,
    #[serde(default)]
    pub books: Vec<SeedBook>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedGenre {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// Slug of an existing or seeded genre
    pub genre: String,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub cover_image_fallback: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub summary: Option<SeedSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedSummary {
    #[serde(default)]
    pub overview_text: String,
    #[serde(default)]
    pub main_content: String,
    #[serde(default)]
    pub key_takeaways: Vec<Takeaway>,
    #[serde(default)]
    pub who_should_read: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_reading_time")]
    pub reading_time: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub executive_summary: Option<String>,
    #[serde(default)]
    pub quote_of_the_book: Option<String>,
    #[serde(default)]
    pub analogies: Vec<Analogy>,
    #[serde(default)]
    pub quotes: Vec<String>,
    #[serde(default)]
    pub action_steps: Vec<String>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub workflow_data: Option<String>,
    #[serde(default)]
    pub images: Vec<SeedImage>,
}

impl Default for SeedSummary {
    fn default() -> Self {
        Self {
            overview_text: String::new(),
            main_content: String::new(),
            key_takeaways: Vec::new(),
            who_should_read: None,
            difficulty: default_difficulty(),
            reading_time: default_reading_time(),
            rating: 0.0,
            executive_summary: None,
            quote_of_the_book: None,
            analogies: Vec::new(),
            quotes: Vec::new(),
            action_steps: Vec::new(),
            seo_title: None,
            seo_description: None,
            workflow_data: None,
            images: Vec::new(),
        }
    }
}

fn default_difficulty() -> String {
    "intermediate".to_string()
}

fn default_reading_time() -> i64 {
    10
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedImage {
    pub image_url: String,
    #[serde(default = "default_section_type")]
    pub section_type: String,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

fn default_section_type() -> String {
    "concept".to_string()
}

/// What a seed run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub genres_inserted: usize,
    pub books_inserted: usize,
    pub books_skipped: usize,
    pub summaries_inserted: usize,
    pub images_inserted: usize,
}

impl SeedCatalog {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Insert the catalog in one transaction
///
/// Existing genres (by slug) are reused; books whose slug already exists are
/// skipped along with their summaries.
pub async fn seed_database(pool: &SqlitePool, catalog: &SeedCatalog) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut tx = pool.begin().await?;

    for genre in &catalog.genres {
        let slug = genre.slug.clone().unwrap_or_else(|| slugify(&genre.name));
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO genres (name, slug, description, icon, image_url)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&genre.name)
        .bind(&slug)
        .bind(&genre.description)
        .bind(genre.icon.as_deref().unwrap_or(super::DEFAULT_GENRE_ICON))
        .bind(&genre.image_url)
        .execute(&mut *tx)
        .await?;
        report.genres_inserted += result.rows_affected() as usize;
    }

    for book in &catalog.books {
        let slug = book.slug.clone().unwrap_or_else(|| slugify(&book.title));

        let genre_id: Option<i64> = sqlx::query_scalar("SELECT id FROM genres WHERE slug = ?")
            .bind(&book.genre)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(genre_id) = genre_id else {
            return Err(Error::InvalidInput(format!(
                "Book '{}' references unknown genre '{}'",
                book.title, book.genre
            )));
        };

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM books WHERE slug = ?")
            .bind(&slug)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            debug!("Book {} already present, skipping", slug);
            report.books_skipped += 1;
            continue;
        }

        let book_id = sqlx::query(
            r#"
            INSERT INTO books (title, author, slug, cover_image_url, cover_image_fallback,
                               isbn, publication_year, genre_id, is_featured)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&slug)
        .bind(&book.cover_image_url)
        .bind(&book.cover_image_fallback)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(genre_id)
        .bind(book.is_featured)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        report.books_inserted += 1;

        let Some(summary) = &book.summary else {
            continue;
        };

        let rating = if (0.0..=5.0).contains(&summary.rating) {
            summary.rating
        } else {
            warn!("Rating {} for {} out of range, clamping", summary.rating, slug);
            summary.rating.clamp(0.0, 5.0)
        };

        let summary_id = sqlx::query(
            r#"
            INSERT INTO summaries (book_id, overview_text, main_content, key_takeaways,
                                   who_should_read, difficulty, reading_time, rating,
                                   executive_summary, quote_of_the_book, analogies, quotes,
                                   action_steps, seo_title, seo_description, workflow_data)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book_id)
        .bind(&summary.overview_text)
        .bind(&summary.main_content)
        .bind(serde_json::to_string(&summary.key_takeaways)?)
        .bind(&summary.who_should_read)
        .bind(&summary.difficulty)
        .bind(summary.reading_time)
        .bind(rating)
        .bind(&summary.executive_summary)
        .bind(&summary.quote_of_the_book)
        .bind(serde_json::to_string(&summary.analogies)?)
        .bind(serde_json::to_string(&summary.quotes)?)
        .bind(serde_json::to_string(&summary.action_steps)?)
        .bind(&summary.seo_title)
        .bind(&summary.seo_description)
        .bind(&summary.workflow_data)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        report.summaries_inserted += 1;

        for (order, image) in summary.images.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO summary_images (summary_id, image_url, section_type, section_title,
                                            alt_text, caption, display_order)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(summary_id)
            .bind(&image.image_url)
            .bind(&image.section_type)
            .bind(&image.section_title)
            .bind(&image.alt_text)
            .bind(&image.caption)
            .bind(order as i64)
            .execute(&mut *tx)
            .await?;
            report.images_inserted += 1;
        }
    }

    tx.commit().await?;

    info!(
        "Seeded {} genres, {} books ({} skipped), {} summaries, {} images",
        report.genres_inserted,
        report.books_inserted,
        report.books_skipped,
        report.summaries_inserted,
        report.images_inserted
    );
    Ok(report)
}

/// Delete every catalog row (children first)
pub async fn reset_database(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;
    for table in ["summary_images", "summaries", "books", "genres"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    info!("Catalog tables cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::db::queries;
    use tempfile::TempDir;

    const SEED: &str = r#"
    {
        "genres": [
            { "name": "Self Help", "icon": "🌱" },
            { "name": "Business", "slug": "business" }
        ],
        "books": [
            {
                "title": "Atomic Habits",
                "author": "James Clear",
                "genre": "self-help",
                "publication_year": 2018,
                "is_featured": true,
                "summary": {
                    "overview_text": "Tiny changes.",
                    "key_takeaways": [{"title": "1%", "text": "Small gains compound"}, "Systems beat goals"],
                    "rating": 4.8,
                    "images": [{ "image_url": "https://img.example/a.png" }]
                }
            },
            { "title": "Zero to One", "author": "Peter Thiel", "genre": "business" }
        ]
    }
    "#;

    #[tokio::test]
    async fn test_seed_inserts_rows_and_slugs() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("seed.db")).await.unwrap();
        let catalog = SeedCatalog::from_json(SEED).unwrap();

        let report = seed_database(&pool, &catalog).await.unwrap();
        assert_eq!(report.genres_inserted, 2);
        assert_eq!(report.books_inserted, 2);
        assert_eq!(report.summaries_inserted, 1);
        assert_eq!(report.images_inserted, 1);

        let book = queries::get_book_by_slug(&pool, "atomic-habits")
            .await
            .unwrap()
            .expect("slug derived from title");
        assert_eq!(book.genre.slug, "self-help");
        assert_eq!(book.genre.icon, "🌱");
        assert!(book.book.is_featured);

        let summary = queries::get_summary_for_book(&pool, book.book.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.key_takeaways.len(), 2);
        assert_eq!(summary.key_takeaways[1].text, "Systems beat goals");
        assert_eq!(summary.difficulty, "intermediate");
    }

    #[tokio::test]
    async fn test_reseed_skips_existing_books() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("seed.db")).await.unwrap();
        let catalog = SeedCatalog::from_json(SEED).unwrap();

        seed_database(&pool, &catalog).await.unwrap();
        let second = seed_database(&pool, &catalog).await.unwrap();

        assert_eq!(second.genres_inserted, 0);
        assert_eq!(second.books_inserted, 0);
        assert_eq!(second.books_skipped, 2);
        assert_eq!(queries::get_books_count(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_genre_rolls_back() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("seed.db")).await.unwrap();
        let catalog = SeedCatalog {
            genres: vec![SeedGenre {
                name: "Business".into(),
                ..Default::default()
            }],
            books: vec![SeedBook {
                title: "Lost".into(),
                author: "Nobody".into(),
                genre: "missing".into(),
                ..Default::default()
            }],
        };

        let result = seed_database(&pool, &catalog).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(queries::get_genres_count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("seed.db")).await.unwrap();
        seed_database(&pool, &SeedCatalog::from_json(SEED).unwrap())
            .await
            .unwrap();

        reset_database(&pool).await.unwrap();
        assert_eq!(queries::get_books_count(&pool).await.unwrap(), 0);
        assert_eq!(queries::get_genres_count(&pool).await.unwrap(), 0);
        assert_eq!(queries::get_summaries_count(&pool).await.unwrap(), 0);
    }
}
