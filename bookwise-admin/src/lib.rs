//! # BookWise Admin
//!
//! Maintenance commands for the catalog database: schema init, seeding,
//! cleanup of duplicate and placeholder rows, cover refresh from Google
//! Books, sitemap generation and a content report.

pub mod commands;
pub mod google_books;
pub mod prompt;

/// Catalog bundled with the binary, used when `seed` gets no `--file`
pub const DEFAULT_SEED: &str = include_str!("../data/seed.json");
