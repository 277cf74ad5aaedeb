//! Book, search, recommendation and genre endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use bookwise_common::db::{queries, Book, Genre, Summary, SummaryImage};
use bookwise_common::recommend::{self, Recommendation};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

const DEFAULT_SEARCH_LIMIT: i64 = 20;
const MAX_SEARCH_LIMIT: i64 = 100;
const DEFAULT_RECOMMENDATIONS: usize = 6;
const MAX_RECOMMENDATIONS: usize = 50;

#[derive(Debug, Serialize)]
pub struct BookResponse {
    pub book: Book,
    pub genre: Genre,
    pub summary: Option<Summary>,
    pub images: Vec<SummaryImage>,
}

/// GET /api/books/:slug
pub async fn get_book(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<BookResponse>> {
    let found = queries::get_book_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Book '{}'", slug)))?;

    let summary = queries::get_summary_for_book(&state.db, found.book.id).await?;
    let images = match &summary {
        Some(summary) => queries::get_images_for_summary(&state.db, summary.id).await?,
        None => Vec::new(),
    };

    Ok(Json(BookResponse {
        book: found.book,
        genre: found.genre,
        summary,
        images,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<Book>,
}

/// GET /api/search?q=&limit=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Err(ApiError::BadRequest("Query parameter 'q' is required".to_string()));
    }

    let limit = params
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);
    let results = queries::search_books(&state.db, &query, limit).await?;

    Ok(Json(SearchResponse {
        query,
        count: results.len(),
        results,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub slug: String,
    pub recommendations: Vec<Recommendation>,
}

/// GET /api/books/:slug/recommendations?limit=
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<RecommendationQuery>,
) -> ApiResult<Json<RecommendationResponse>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_RECOMMENDATIONS)
        .clamp(1, MAX_RECOMMENDATIONS);

    let catalog = state.caches.catalog(&state.db).await?;
    let current = catalog
        .iter()
        .find(|entry| entry.book.slug == slug)
        .ok_or_else(|| ApiError::NotFound(format!("Book '{}'", slug)))?;

    Ok(Json(RecommendationResponse {
        recommendations: recommend::recommend(current, &catalog, limit),
        slug,
    }))
}

#[derive(Debug, Serialize)]
pub struct GenreEntry {
    #[serde(flatten)]
    pub genre: Genre,
    pub book_count: i64,
}

/// GET /api/genres
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<GenreEntry>>> {
    let genres = state
        .caches
        .genre_counts(&state.db)
        .await?
        .into_iter()
        .map(|(genre, book_count)| GenreEntry { genre, book_count })
        .collect();
    Ok(Json(genres))
}
