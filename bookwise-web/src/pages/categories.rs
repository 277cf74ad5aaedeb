//! Categories: genre overview and per-genre browsing with filters and pagination

use axum::{
    extract::{Extension, Query, State},
    response::Html,
};
use bookwise_common::db::{queries, Genre};
use bookwise_common::filters::{apply_filters, filter_options, BookFilters, SortOrder};
use bookwise_common::pagination::{page_buttons, paginate, PageState, PaginationConfig};
use bookwise_common::text_utils::{encode_query, escape_html};
use serde::Deserialize;

use super::layout;
use crate::session::SessionId;
use crate::{AppState, PageError, PageResult};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub name: Option<String>,
    pub year: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// GET /categories
pub async fn categories_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(params): Query<CategoryQuery>,
) -> PageResult<Html<String>> {
    match params.name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => {
            let genre = queries::get_genre_by_slug(&state.db, slug)
                .await?
                .ok_or_else(|| {
                    PageError::not_found(
                        "Category not found",
                        format!("There is no category called “{}”.", slug),
                    )
                })?;
            genre_page(&state, session, genre, &params).await
        }
        None => overview_page(&state).await,
    }
}

async fn overview_page(state: &AppState) -> PageResult<Html<String>> {
    let genre_counts = state.caches.genre_counts(&state.db).await?;

    let mut body = String::from("<h1>📖 All Categories</h1><p>Dive deep into topics that matter to you</p>");
    if genre_counts.is_empty() {
        body.push_str("<p>No categories yet.</p>");
    }
    body.push_str(r#"<div class="grid">"#);
    for (genre, count) in &genre_counts {
        body.push_str(&layout::genre_card(genre, Some(*count)));
    }
    body.push_str("</div>");

    Ok(layout::render_page(
        "Categories",
        "Browse book summaries by category",
        &body,
    ))
}

async fn genre_page(
    state: &AppState,
    session: SessionId,
    genre: Genre,
    params: &CategoryQuery,
) -> PageResult<Html<String>> {
    let filters = BookFilters {
        year: params.year.as_deref().and_then(|y| y.parse().ok()),
        sort: params
            .sort
            .as_deref()
            .map(SortOrder::from_param)
            .unwrap_or_default(),
    };

    let books = state.caches.books_in_genre(&state.db, &genre.slug).await?;
    let filtered = apply_filters(&books, &filters);

    // Page state lives in the session, keyed by genre
    let config = PaginationConfig::default();
    let key = format!("genre:{}", genre.slug);
    let mut page_state: PageState = state
        .sessions
        .update(session, |s| {
            let page_state = s.page_state_mut(&key);
            if let Some(per_page) = params.per_page.filter(|n| config.page_size_options.contains(n)) {
                if per_page != page_state.items_per_page {
                    page_state.set_items_per_page(per_page);
                }
            }
            if let Some(page) = params.page {
                page_state.set_page(page);
            }
            *page_state
        })
        .await;

    let page = paginate(&filtered, &mut page_state);
    state
        .sessions
        .update(session, |s| *s.page_state_mut(&key) = page_state)
        .await;

    let covers = state.images.book_covers(page.items).await;
    let options = filter_options(&state.db).await?;

    let mut body = format!(
        "<h1>{} {}</h1><p>{}</p>",
        escape_html(&genre.icon),
        escape_html(&genre.name),
        escape_html(genre.description.as_deref().unwrap_or_default())
    );

    body.push_str(&filter_form(&genre, &filters, &options.years, page.items_per_page, &config));

    if filtered.is_empty() {
        body.push_str("<p>No books match these filters.</p>");
    } else {
        let (first, last) = page.item_range();
        body.push_str(&format!(
            r#"<p class="meta">Showing {}–{} of {} books</p>"#,
            first, last, page.total_items
        ));
        body.push_str(&layout::book_grid(page.items, &covers));

        let buttons = page_buttons(page.current_page, page.total_pages, &config);
        let base = page_base(&genre, &filters, page.items_per_page);
        body.push_str(&layout::pagination_nav(&buttons, |n| format!("{}&page={}", base, n)));
    }

    Ok(layout::render_page(
        &genre.name,
        &format!("{} book summaries", genre.name),
        &body,
    ))
}

fn page_base(genre: &Genre, filters: &BookFilters, per_page: usize) -> String {
    let mut base = format!(
        "/categories?name={}&sort={}&per_page={}",
        encode_query(&genre.slug),
        filters.sort.as_param(),
        per_page
    );
    if let Some(year) = filters.year {
        base.push_str(&format!("&year={}", year));
    }
    base
}

fn filter_form(
    genre: &Genre,
    filters: &BookFilters,
    years: &[i64],
    per_page: usize,
    config: &PaginationConfig,
) -> String {
    let mut year_options = String::from(r#"<option value="">All years</option>"#);
    for year in years {
        let selected = if filters.year == Some(*year) { " selected" } else { "" };
        year_options.push_str(&format!(r#"<option value="{0}"{1}>{0}</option>"#, year, selected));
    }

    let sort_options: String = SortOrder::ALL
        .iter()
        .map(|order| {
            let selected = if *order == filters.sort { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                order.as_param(),
                selected,
                order.label()
            )
        })
        .collect();

    let size_options: String = config
        .page_size_options
        .iter()
        .map(|n| {
            let selected = if *n == per_page { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0} per page</option>"#, n, selected)
        })
        .collect();

    format!(
        r#"<form class="filters" method="get" action="/categories">
{hidden}
<label>Year<br><select name="year">{years}</select></label>
<label>Sort by<br><select name="sort">{sorts}</select></label>
<label>Show<br><select name="per_page">{sizes}</select></label>
<button type="submit">Apply</button>
</form>"#,
        hidden = layout::hidden("name", &genre.slug),
        years = year_options,
        sorts = sort_options,
        sizes = size_options,
    )
}
