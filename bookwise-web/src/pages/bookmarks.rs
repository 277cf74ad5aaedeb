//! Bookmarks page and the bookmark toggle action

use axum::{
    extract::{Extension, Form, State},
    http::HeaderValue,
    response::{Html, Redirect},
};
use bookwise_common::db::queries;
use bookwise_common::recommend;
use serde::Deserialize;
use tracing::warn;

use super::{book::find_book, book::recommendation_grid, layout};
use crate::session::SessionId;
use crate::{AppState, PageResult};

const PERSONALIZED_LIMIT: usize = 6;

/// GET /bookmarks
pub async fn bookmarks_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> PageResult<Html<String>> {
    let session_state = state.sessions.snapshot(session).await;
    let slugs = session_state.bookmarked_slugs();

    let mut body = String::from("<h1>🔖 Your Bookmarks</h1>");

    if slugs.is_empty() {
        body.push_str(
            "<p>You haven't bookmarked any books yet. Use the ☆ Bookmark button on a book page to save it here.</p>",
        );
    } else {
        let slug_refs: Vec<&str> = slugs.iter().map(String::as_str).collect();
        let books = queries::get_books_by_slugs(&state.db, &slug_refs).await?;
        let covers = state.images.book_covers(&books).await;

        let cards: String = books
            .iter()
            .zip(&covers)
            .map(|(book, cover)| {
                let remove = format!(
                    r#"<form method="post" action="/bookmarks/toggle">{}{}<button type="submit" class="secondary">Remove</button></form>"#,
                    layout::hidden("slug", &book.slug),
                    layout::hidden("return_to", "/bookmarks")
                );
                layout::book_card(book, cover, &remove)
            })
            .collect();
        body.push_str(&format!(
            r#"<p class="meta">{} saved books</p><div class="grid">{}</div>"#,
            books.len(),
            cards
        ));
    }

    body.push_str(if slugs.is_empty() {
        "<h2>⭐ Top Rated to Get You Started</h2>"
    } else {
        "<h2>🎯 Recommended for You</h2>"
    });
    match state.caches.catalog(&state.db).await {
        Ok(catalog) => {
            let picks = recommend::personalized(&slugs, &catalog, PERSONALIZED_LIMIT);
            if picks.is_empty() {
                body.push_str("<p>No recommendations yet.</p>");
            } else {
                body.push_str(&recommendation_grid(&state, &picks).await);
            }
        }
        Err(e) => {
            warn!("Catalog load failed for personalized picks: {}", e);
            body.push_str("<p>Could not load recommendations.</p>");
        }
    }

    Ok(layout::render_page("Bookmarks", "Your saved books", &body))
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub slug: String,
    pub return_to: Option<String>,
}

/// POST /bookmarks/toggle
pub async fn post_toggle_bookmark(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<ToggleForm>,
) -> PageResult<Redirect> {
    let found = find_book(&state, &form.slug).await?;
    let book = &found.book;

    state
        .sessions
        .update(session, |s| s.toggle_bookmark(&book.slug, &book.title, &book.author))
        .await;

    let target = form
        .return_to
        .as_deref()
        .filter(|path| is_local_path(path))
        .map(str::to_string)
        .unwrap_or_else(|| layout::book_href(&book.slug));
    Ok(Redirect::to(&target))
}

/// Only same-site absolute paths that fit in a Location header are accepted
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
        && HeaderValue::from_str(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_local_return_paths() {
        assert!(is_local_path("/bookmarks"));
        assert!(is_local_path("/book?slug=grit"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("/book\nx"));
        assert!(!is_local_path("/book\u{7f}x"));
    }
}
