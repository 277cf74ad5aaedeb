//! Browse filters for genre pages

use crate::db::models::Book;
use crate::db::queries;
use crate::Result;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

pub const READING_TIME_BUCKETS: [i64; 5] = [5, 10, 15, 20, 30];
pub const DIFFICULTY_LEVELS: [&str; 3] = ["beginner", "intermediate", "advanced"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    TitleAsc,
    TitleDesc,
    Newest,
    Oldest,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::TitleAsc,
        SortOrder::TitleDesc,
        SortOrder::Newest,
        SortOrder::Oldest,
    ];

    /// Query-string value; unknown values mean the default order
    pub fn from_param(value: &str) -> Self {
        match value {
            "title-desc" => SortOrder::TitleDesc,
            "newest" => SortOrder::Newest,
            "oldest" => SortOrder::Oldest,
            _ => SortOrder::TitleAsc,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::TitleAsc => "Title (A-Z)",
            SortOrder::TitleDesc => "Title (Z-A)",
            SortOrder::Newest => "Newest First",
            SortOrder::Oldest => "Oldest First",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilters {
    pub year: Option<i64>,
    pub sort: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i64>,
    pub reading_times: Vec<i64>,
    pub difficulties: Vec<String>,
}

pub async fn filter_options(pool: &SqlitePool) -> Result<FilterOptions> {
    Ok(FilterOptions {
        years: queries::get_publication_years(pool).await?,
        reading_times: READING_TIME_BUCKETS.to_vec(),
        difficulties: DIFFICULTY_LEVELS.iter().map(|d| d.to_string()).collect(),
    })
}

/// Year filter then sort; books with unknown year sort last by date
pub fn apply_filters(books: &[Book], filters: &BookFilters) -> Vec<Book> {
    let mut filtered: Vec<Book> = match filters.year {
        Some(year) => books
            .iter()
            .filter(|b| b.publication_year == Some(year))
            .cloned()
            .collect(),
        None => books.to_vec(),
    };

    match filters.sort {
        SortOrder::TitleAsc => filtered.sort_by_key(|b| b.title.to_lowercase()),
        SortOrder::TitleDesc => {
            filtered.sort_by_key(|b| std::cmp::Reverse(b.title.to_lowercase()))
        }
        SortOrder::Newest => {
            filtered.sort_by_key(|b| std::cmp::Reverse(b.publication_year.unwrap_or(i64::MIN)))
        }
        SortOrder::Oldest => filtered.sort_by_key(|b| b.publication_year.unwrap_or(i64::MAX)),
    }

    filtered
}
