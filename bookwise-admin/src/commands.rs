//! Admin subcommand implementations
//!
//! Each command writes its human-readable output to `out` and returns a
//! report of what it changed.

use anyhow::{Context, Result};
use bookwise_common::db::maintenance::{
    self, content_report, delete_books, find_duplicates, find_dummy_books, has_google_cover,
    ContentReport, DeleteReport,
};
use bookwise_common::db::queries;
use bookwise_common::db::seed::{reset_database, seed_database, SeedCatalog, SeedReport};
use bookwise_common::sitemap::{generate_robots_txt, generate_sitemap, sitemap_stats, SitemapStats};
use chrono::NaiveDate;
use sqlx::SqlitePool;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use crate::google_books::GoogleBooksClient;
use crate::prompt::Confirm;

/// Cover refresh commits after this many processed books
const COMMIT_EVERY: usize = 10;

const RULE: &str = "======================================================================";

pub async fn seed(
    pool: &SqlitePool,
    catalog: &SeedCatalog,
    reset: bool,
    out: &mut impl Write,
) -> Result<SeedReport> {
    if reset {
        reset_database(pool).await.context("Failed to clear catalog")?;
        writeln!(out, "🗑️  Cleared existing catalog")?;
    }

    writeln!(
        out,
        "🌱 Seeding {} genres and {} books...",
        catalog.genres.len(),
        catalog.books.len()
    )?;
    let report = seed_database(pool, catalog).await.context("Seeding failed")?;

    writeln!(out, "✓ Genres inserted: {}", report.genres_inserted)?;
    writeln!(out, "✓ Books inserted: {}", report.books_inserted)?;
    if report.books_skipped > 0 {
        writeln!(out, "⊙ Books skipped (slug exists): {}", report.books_skipped)?;
    }
    writeln!(out, "✓ Summaries inserted: {}", report.summaries_inserted)?;
    writeln!(out, "✓ Images inserted: {}", report.images_inserted)?;
    Ok(report)
}

/// Remove books sharing title and author with an earlier row
///
/// Returns `None` when nothing was deleted (no duplicates or cancelled).
pub async fn dedupe(
    pool: &SqlitePool,
    confirm: &mut dyn Confirm,
    out: &mut impl Write,
) -> Result<Option<DeleteReport>> {
    let duplicates = find_duplicates(pool).await?;
    if duplicates.is_empty() {
        writeln!(out, "✓ No duplicates found!")?;
        return Ok(None);
    }

    writeln!(out, "Found {} duplicate books:", duplicates.len())?;
    writeln!(out, "{}", RULE)?;
    for dup in &duplicates {
        writeln!(
            out,
            "📚 '{}' by {}\n   Would delete: ID={}, Slug={} (keeping ID={})",
            dup.book.title, dup.book.author, dup.book.id, dup.book.slug, dup.kept_id
        )?;
    }

    if !confirm.confirm("Proceed with deletion?")? {
        writeln!(out, "Cancelled.")?;
        return Ok(None);
    }

    let ids: Vec<i64> = duplicates.iter().map(|d| d.book.id).collect();
    let report = delete_books(pool, &ids).await?;
    write_delete_report(out, &report)?;
    Ok(Some(report))
}

/// Remove generated placeholder books
pub async fn remove_dummy(
    pool: &SqlitePool,
    confirm: &mut dyn Confirm,
    out: &mut impl Write,
) -> Result<Option<DeleteReport>> {
    let dummies = find_dummy_books(pool).await?;
    if dummies.is_empty() {
        writeln!(out, "✓ No dummy books found!")?;
        return Ok(None);
    }

    writeln!(out, "Found {} dummy books:", dummies.len())?;
    writeln!(out, "{}", RULE)?;
    for book in &dummies {
        writeln!(out, "   Would delete: ID={}, '{}' by {}", book.id, book.title, book.author)?;
    }

    if !confirm.confirm(&format!("Remove {} dummy books?", dummies.len()))? {
        writeln!(out, "Cancelled.")?;
        return Ok(None);
    }

    let ids: Vec<i64> = dummies.iter().map(|b| b.id).collect();
    let report = delete_books(pool, &ids).await?;
    write_delete_report(out, &report)?;
    Ok(Some(report))
}

fn write_delete_report(out: &mut impl Write, report: &DeleteReport) -> std::io::Result<()> {
    writeln!(
        out,
        "✓ Deleted {} books ({} summaries, {} images)",
        report.books, report.summaries, report.images
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverReport {
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Look up every book without a Google Books cover and store the result
///
/// Progress is committed every `COMMIT_EVERY` processed books.
pub async fn refresh_covers(
    pool: &SqlitePool,
    client: &GoogleBooksClient,
    confirm: &mut dyn Confirm,
    out: &mut impl Write,
) -> Result<Option<CoverReport>> {
    let books = queries::get_all_books(pool).await?;
    let pending = books.iter().filter(|b| !has_google_cover(b)).count();

    writeln!(out, "BookWise - Book Cover Updater")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "{} books, {} without a Google Books cover",
        books.len(),
        pending
    )?;

    if !confirm.confirm("Proceed?")? {
        writeln!(out, "Cancelled.")?;
        return Ok(None);
    }

    let mut report = CoverReport {
        total: books.len(),
        ..Default::default()
    };
    let mut tx = pool.begin().await?;

    for (index, book) in books.iter().enumerate() {
        writeln!(out, "[{}/{}] {}", index + 1, books.len(), book.title)?;

        if has_google_cover(book) {
            writeln!(out, "⊙ Already has Google Books cover, skipping")?;
            report.skipped += 1;
            continue;
        }

        match client.find_cover(&book.title, &book.author).await {
            Ok(Some(url)) => {
                maintenance::update_cover_url(&mut *tx, book.id, &url).await?;
                writeln!(out, "✓ Updated cover: {}", url)?;
                report.updated += 1;
            }
            Ok(None) => {
                writeln!(out, "✗ No cover found")?;
                report.failed += 1;
            }
            Err(e) => {
                warn!("Cover lookup failed for '{}': {}", book.title, e);
                writeln!(out, "✗ Lookup failed: {}", e)?;
                report.failed += 1;
            }
        }

        let processed = report.updated + report.failed;
        if processed % COMMIT_EVERY == 0 {
            tx.commit().await?;
            tx = pool.begin().await?;
            writeln!(out, "  → Progress saved ({} updated so far)", report.updated)?;
        }
    }

    tx.commit().await?;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "Total books: {}", report.total)?;
    writeln!(out, "Updated: {}", report.updated)?;
    writeln!(out, "Skipped (already has Google Books cover): {}", report.skipped)?;
    writeln!(out, "Failed: {}", report.failed)?;
    info!(
        "Cover refresh done: {} updated, {} skipped, {} failed",
        report.updated, report.skipped, report.failed
    );
    Ok(Some(report))
}

/// Write sitemap.xml and robots.txt into `out_dir`
pub async fn sitemap(
    pool: &SqlitePool,
    out_dir: &Path,
    base_url: &str,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<SitemapStats> {
    let genres = queries::get_all_genres(pool).await?;
    let books = queries::get_all_books(pool).await?;

    let xml = generate_sitemap(
        base_url,
        genres.iter().map(|g| g.slug.as_str()),
        books.iter().map(|b| b.slug.as_str()),
        today,
    );
    let robots = generate_robots_txt(base_url, today);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let sitemap_path = out_dir.join("sitemap.xml");
    let robots_path = out_dir.join("robots.txt");
    std::fs::write(&sitemap_path, xml)
        .with_context(|| format!("Failed to write {}", sitemap_path.display()))?;
    std::fs::write(&robots_path, robots)
        .with_context(|| format!("Failed to write {}", robots_path.display()))?;

    let stats = sitemap_stats(genres.len(), books.len());
    writeln!(out, "✓ Sitemap generated: {}", sitemap_path.display())?;
    writeln!(out, "✓ Robots.txt generated: {}", robots_path.display())?;
    writeln!(
        out,
        "  URLs: {} ({} static, {} genres, {} books)",
        stats.total_urls, stats.static_pages, stats.genre_pages, stats.book_pages
    )?;
    Ok(stats)
}

pub async fn report(pool: &SqlitePool, out: &mut impl Write) -> Result<ContentReport> {
    let report = content_report(pool).await?;

    writeln!(out, "📊 BookWise content report")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Genres:                 {}", report.genres)?;
    writeln!(out, "Books:                  {}", report.books)?;
    writeln!(out, "Summaries:              {}", report.summaries)?;
    writeln!(out, "Featured books:         {}", report.featured)?;
    writeln!(out, "Books without summary:  {}", report.books_without_summary)?;
    writeln!(out, "Books without cover:    {}", report.books_without_cover)?;

    let per_genre = queries::get_genre_book_counts(pool).await?;
    if !per_genre.is_empty() {
        writeln!(out, "\nBooks per genre:")?;
        for (genre, count) in per_genre {
            writeln!(out, "  {} {:<24} {}", genre.icon, genre.name, count)?;
        }
    }
    Ok(report)
}
