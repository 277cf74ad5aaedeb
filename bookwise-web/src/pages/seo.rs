//! sitemap.xml and robots.txt, generated on request

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use bookwise_common::sitemap::{generate_robots_txt, generate_sitemap};
use chrono::Utc;

use crate::{AppState, PageResult};

/// GET /sitemap.xml
pub async fn sitemap_xml(State(state): State<AppState>) -> PageResult<impl IntoResponse> {
    let genres = state.caches.genres(&state.db).await?;
    let books = state.caches.books(&state.db).await?;

    let xml = generate_sitemap(
        &state.config.base_url,
        genres.iter().map(|g| g.slug.as_str()),
        books.iter().map(|b| b.slug.as_str()),
        Utc::now().date_naive(),
    );
    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}

/// GET /robots.txt
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        generate_robots_txt(&state.config.base_url, Utc::now().date_naive()),
    )
}
