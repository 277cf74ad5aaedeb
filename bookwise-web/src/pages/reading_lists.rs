//! Curated reading lists

use axum::{
    extract::{Path, State},
    response::Html,
};
use bookwise_common::reading_lists::{all_lists, find_list, resolve_list};
use bookwise_common::text_utils::escape_html;

use super::layout;
use crate::{AppState, PageError, PageResult};

/// GET /reading-lists
pub async fn reading_lists_page() -> Html<String> {
    let mut body = String::from(
        "<h1>📋 Curated Reading Lists</h1><p>Hand-picked collections to guide your learning journey</p><div class=\"grid\">",
    );
    for list in all_lists() {
        body.push_str(&format!(
            r#"<a class="card genre-card" href="/reading-lists/{id}"><div class="icon">{icon}</div><div class="title">{title}</div><div class="meta">{description}</div><div class="meta">{count} books</div></a>"#,
            id = list.id,
            icon = list.icon,
            title = escape_html(list.title),
            description = escape_html(list.description),
            count = list.books.len(),
        ));
    }
    body.push_str("</div>");

    layout::render_page("Reading Lists", "Curated book collections", &body)
}

/// GET /reading-lists/:id
pub async fn reading_list_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult<Html<String>> {
    let list = find_list(&id).ok_or_else(|| {
        PageError::not_found("Reading list not found", format!("No reading list “{}”.", id))
    })?;

    let books = resolve_list(&state.db, list).await?;
    let covers = state.images.book_covers(&books).await;

    let mut body = format!(
        r#"<p><a href="/reading-lists">← All reading lists</a></p><h1>{} {}</h1><p>{}</p>"#,
        list.icon,
        escape_html(list.title),
        escape_html(list.description)
    );
    if books.is_empty() {
        body.push_str("<p>None of the books in this list are in the catalog yet.</p>");
    } else {
        body.push_str(&format!(
            r#"<p class="meta">{} of {} books available</p>"#,
            books.len(),
            list.books.len()
        ));
        body.push_str(&layout::book_grid(&books, &covers));
    }

    Ok(layout::render_page(list.title, list.description, &body))
}
