//! Catalog statistics page

use axum::{extract::State, response::Html};
use bookwise_common::db::queries;
use bookwise_common::sitemap::sitemap_stats;
use bookwise_common::text_utils::escape_html;
use chrono::Local;

use super::layout;
use crate::{AppState, PageResult};

const TOP_GENRES: usize = 5;

/// GET /admin/stats
pub async fn stats_page(State(state): State<AppState>) -> PageResult<Html<String>> {
    let books = queries::get_books_count(&state.db).await?;
    let genres = queries::get_genres_count(&state.db).await?;
    let summaries = queries::get_summaries_count(&state.db).await?;
    let avg_per_genre = if genres > 0 { books / genres } else { 0 };

    let mut distribution = queries::get_genre_book_counts(&state.db).await?;
    distribution.sort_by(|a, b| b.1.cmp(&a.1));

    let mut body = format!(
        r#"<h1>📊 Admin Dashboard</h1>
<div class="stats">
<div class="stat"><div class="value">{}</div>Books</div>
<div class="stat"><div class="value">{}</div>Genres</div>
<div class="stat"><div class="value">{}</div>Summaries</div>
<div class="stat"><div class="value">{}</div>Avg per Genre</div>
</div>
<h2>Genre Distribution</h2>"#,
        books, genres, summaries, avg_per_genre
    );

    for (genre, count) in distribution.iter().take(TOP_GENRES) {
        let pct = if books > 0 { *count as f64 / books as f64 * 100.0 } else { 0.0 };
        body.push_str(&format!(
            r#"<div style="display:flex;gap:10px;align-items:center;margin-bottom:8px"><span>{}</span><span style="width:180px">{}</span><div class="progress-bar" style="flex:1"><div style="width:{:.0}%"></div></div><span>{} ({:.0}%)</span></div>"#,
            escape_html(&genre.icon),
            escape_html(&genre.name),
            pct,
            count,
            pct
        ));
    }

    let sitemap = sitemap_stats(genres as usize, books as usize);
    body.push_str(&format!(
        r#"<h2>System</h2><div class="panel"><p>Sitemap URLs: {} ({} static, {} genres, {} books)</p><p>Active sessions: {}</p><p>Generated: {}</p></div>"#,
        sitemap.total_urls,
        sitemap.static_pages,
        sitemap.genre_pages,
        sitemap.book_pages,
        state.sessions.len().await,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    Ok(layout::render_page("Admin Stats", "Catalog statistics", &body))
}
