//! Home page: hero, search, stats, book of the day, featured books, genres

use axum::{
    extract::{Query, State},
    response::Html,
};
use bookwise_common::db::{queries, Book};
use bookwise_common::discovery::book_of_the_day;
use bookwise_common::reading_lists::all_lists;
use bookwise_common::text_utils::{escape_html, truncate};
use chrono::Utc;
use serde::Deserialize;

use super::layout;
use crate::{AppState, PageResult};

const FEATURED_LIMIT: i64 = 6;
const SEARCH_LIMIT: i64 = 20;
const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    pub q: Option<String>,
}

/// GET /
pub async fn home_page(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> PageResult<Html<String>> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();

    let books = state.caches.books(&state.db).await?;
    let genre_counts = state.caches.genre_counts(&state.db).await?;
    let summaries = queries::get_summaries_count(&state.db).await?;

    let mut body = String::new();
    body.push_str(&hero(query));
    body.push_str(&stats_bar(books.len(), genre_counts.len(), summaries));

    if let Some(pick) = book_of_the_day(&books, Utc::now().date_naive()) {
        let cover = state.images.book_cover(pick).await;
        body.push_str(&book_of_the_day_panel(pick, &cover));
    }

    if query.chars().count() >= MIN_QUERY_CHARS {
        let results = queries::search_books(&state.db, query, SEARCH_LIMIT).await?;
        body.push_str(&format!(
            "<h2>🔍 Results for “{}” ({})</h2>",
            escape_html(query),
            results.len()
        ));
        if results.is_empty() {
            body.push_str("<p>No books match your search. Try a title or an author name.</p>");
        } else {
            let covers = state.images.book_covers(&results).await;
            body.push_str(&layout::book_grid(&results, &covers));
        }
    } else {
        let featured = queries::get_featured_books(&state.db, FEATURED_LIMIT).await?;
        if !featured.is_empty() {
            body.push_str("<h2>✨ Featured Masterpieces</h2>");
            body.push_str("<p>Handpicked summaries to accelerate your growth</p>");
            let covers = state.images.book_covers(&featured).await;
            body.push_str(&layout::book_grid(&featured, &covers));
        }
    }

    body.push_str("<h2>🎯 Explore by Category</h2><div class=\"grid\">");
    for (genre, count) in &genre_counts {
        body.push_str(&layout::genre_card(genre, Some(*count)));
    }
    body.push_str("</div>");

    body.push_str("<h2>📋 Curated Reading Lists</h2><div class=\"grid\">");
    for list in all_lists().iter().take(3) {
        body.push_str(&format!(
            r#"<a class="card genre-card" href="/reading-lists/{}"><div class="icon">{}</div><div class="title">{}</div><div class="meta">{} books</div></a>"#,
            list.id,
            list.icon,
            escape_html(list.title),
            list.books.len()
        ));
    }
    body.push_str("</div>");

    Ok(layout::render_page(
        "Transform Your Life",
        "Expert book summaries, key frameworks and actionable insights",
        &body,
    ))
}

fn hero(query: &str) -> String {
    format!(
        r#"<section class="hero">
<h1>Transform Your Life,<br>One Book at a Time</h1>
<p>Master the world's most influential books in minutes. Expert summaries · Key frameworks · Actionable insights</p>
<form class="search" method="get" action="/">
    <input type="text" name="q" value="{}" placeholder="🔍 Search by title or author...">
    <button type="submit">Search</button>
</form>
</section>"#,
        escape_html(query)
    )
}

fn stats_bar(books: usize, genres: usize, summaries: i64) -> String {
    format!(
        r#"<div class="stats">
<div class="stat"><div class="value">{}</div>Book Summaries</div>
<div class="stat"><div class="value">{}</div>Genres</div>
<div class="stat"><div class="value">{}</div>Curated Write-ups</div>
<div class="stat"><div class="value">100%</div>Free Access</div>
</div>"#,
        books, genres, summaries
    )
}

fn book_of_the_day_panel(book: &Book, cover: &str) -> String {
    format!(
        r#"<div class="panel" style="display:flex;gap:20px;align-items:center">
<img src="{cover}" alt="{title}" style="width:80px;height:120px;object-fit:cover;border-radius:8px">
<div>
<div class="meta">📅 {date} · Book of the Day</div>
<h3>{title}</h3>
<p>by {author}</p>
<a class="button" href="{href}">📖 Read Today's Pick</a>
</div>
</div>"#,
        cover = escape_html(cover),
        date = Utc::now().format("%B %-d, %Y"),
        title = escape_html(&truncate(&book.title, 50)),
        author = escape_html(&book.author),
        href = layout::book_href(&book.slug),
    )
}
