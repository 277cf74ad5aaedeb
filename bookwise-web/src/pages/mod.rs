//! HTML pages
//!
//! Every page is rendered server-side from `format!` templates wrapped in the
//! shared layout. Page routes run behind the session middleware.

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

mod admin;
mod ai;
mod book;
mod bookmarks;
mod categories;
mod discover;
mod home;
mod info;
pub mod layout;
mod reading_lists;
mod seo;
mod static_assets;

/// Build session-aware page routes
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home_page))
        .route("/categories", get(categories::categories_page))
        .route("/book", get(book::book_page))
        .route("/book/chat", post(book::post_chat))
        .route("/book/chat/clear", post(book::post_clear_chat))
        .route("/book/progress", post(book::post_progress))
        .route("/bookmarks", get(bookmarks::bookmarks_page))
        .route("/bookmarks/toggle", post(bookmarks::post_toggle_bookmark))
        .route("/reading-lists", get(reading_lists::reading_lists_page))
        .route("/reading-lists/:id", get(reading_lists::reading_list_page))
        .route("/ai", get(ai::ai_page))
        .route("/random", get(discover::random_book))
        .route("/about", get(info::about_page))
        .route("/privacy", get(info::privacy_page))
        .route("/terms", get(info::terms_page))
        .route("/admin/stats", get(admin::stats_page))
}

/// Build crawler-facing routes and static assets (no session)
pub fn seo_routes() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(seo::sitemap_xml))
        .route("/robots.txt", get(seo::robots_txt))
        .route("/static/bookwise.css", get(static_assets::serve_bookwise_css))
}
