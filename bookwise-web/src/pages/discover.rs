//! Random book discovery

use axum::{extract::State, response::Redirect};
use bookwise_common::discovery::random_pick;

use super::layout;
use crate::{AppState, PageResult};

/// GET /random
pub async fn random_book(State(state): State<AppState>) -> PageResult<Redirect> {
    let books = state.caches.books(&state.db).await?;
    let target = match random_pick(&books) {
        Some(book) => layout::book_href(&book.slug),
        None => "/".to_string(),
    };
    Ok(Redirect::to(&target))
}
