//! JSON API handlers

pub mod books;
pub mod buildinfo;
pub mod health;

use axum::{routing::get, Router};

use crate::AppState;

pub use buildinfo::get_build_info;
pub use health::health_routes;

/// Build JSON API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/books/:slug", get(books::get_book))
        .route("/api/books/:slug/recommendations", get(books::get_recommendations))
        .route("/api/search", get(books::search))
        .route("/api/genres", get(books::list_genres))
        .route("/api/buildinfo", get(get_build_info))
}
