//! Book detail page and its form actions (chat, progress)

use axum::{
    extract::{Extension, Form, Query, State},
    response::{Html, Redirect},
};
use bookwise_common::ai::{BookContext, ChatMessage, ChatRole, NOT_CONFIGURED_MESSAGE};
use bookwise_common::db::{queries, BookWithGenre, CatalogEntry, Summary, SummaryImage};
use bookwise_common::images::ImageKind;
use bookwise_common::recommend::{self, Recommendation};
use bookwise_common::session::{SessionState, PROGRESS_SECTIONS};
use bookwise_common::text_utils::{escape_html, format_reading_time};
use bookwise_common::tts::{render_audio_player, render_mini_player, PlayerOptions};
use serde::Deserialize;
use tracing::{debug, warn};

use super::layout;
use crate::session::SessionId;
use crate::{AppState, PageError, PageResult};

const RECOMMENDATION_LIMIT: usize = 6;
const SAME_GENRE_LIMIT: usize = 4;
const MAX_QUOTES: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub slug: Option<String>,
}

/// GET /book?slug=
pub async fn book_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(params): Query<BookQuery>,
) -> PageResult<Html<String>> {
    let Some(slug) = params.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(choose_book_prompt());
    };

    let found = find_book(&state, slug).await?;
    let summary = queries::get_summary_for_book(&state.db, found.book.id)
        .await?
        .ok_or_else(|| {
            PageError::not_found(
                "Summary not found",
                format!("“{}” does not have a summary yet.", found.book.title),
            )
        })?;
    let images = queries::get_images_for_summary(&state.db, summary.id).await?;
    let session_state = state.sessions.snapshot(session).await;

    let cover = state.images.book_cover(&found.book).await;
    let concept_images = resolve_images(&state, &images).await;

    let mut body = String::new();
    body.push_str(&header_section(&found, &summary, &cover, &session_state));
    body.push_str(&content_sections(&summary, &concept_images));
    body.push_str(&audio_section(&found, &summary));
    body.push_str(&progress_section(&found.book.slug, &session_state));
    body.push_str(&chat_section(&state, &found.book.slug, &found.book.title, &session_state));
    body.push_str(&related_sections(&state, &found).await);

    let title = summary.seo_title.clone().unwrap_or_else(|| found.book.title.clone());
    let description = summary
        .seo_description
        .clone()
        .unwrap_or_else(|| format!("Summary of {} by {}", found.book.title, found.book.author));

    Ok(layout::render_page(&title, &description, &body))
}

pub(crate) async fn find_book(state: &AppState, slug: &str) -> PageResult<BookWithGenre> {
    queries::get_book_by_slug(&state.db, slug)
        .await?
        .ok_or_else(|| {
            PageError::not_found(
                "Book not found",
                format!("We couldn't find a book with the identifier “{}”.", slug),
            )
        })
}

fn choose_book_prompt() -> Html<String> {
    let body = r#"<div class="notice"><div class="icon">📖</div><h1>Choose a book</h1>
<p>Pick a book from a category or search the catalog to read its summary.</p>
<p><a class="button" href="/categories">Browse categories</a></p></div>"#;
    layout::render_page("Book Detail", "Choose a book to read its summary", body)
}

async fn resolve_images<'a>(
    state: &AppState,
    images: &'a [SummaryImage],
) -> Vec<(String, &'a SummaryImage)> {
    let requests: Vec<_> = images
        .iter()
        .map(|image| (Some(image.image_url.as_str()), ImageKind::from_name(&image.section_type)))
        .collect();
    let urls = state.images.load_images_safe(&requests).await;
    urls.into_iter().zip(images).collect()
}

fn header_section(
    found: &BookWithGenre,
    summary: &Summary,
    cover: &str,
    session: &SessionState,
) -> String {
    let book = &found.book;
    let mut chips = vec![format!(
        r#"<a href="{}">{} {}</a>"#,
        layout::genre_href(&found.genre.slug),
        escape_html(&found.genre.icon),
        escape_html(&found.genre.name)
    )];
    if let Some(year) = book.publication_year {
        chips.push(format!("📅 {}", year));
    }
    chips.push(format!("⏱️ {}", format_reading_time(summary.reading_time)));
    chips.push(format!("📊 {}", escape_html(&summary.difficulty)));
    if let Some(isbn) = book.isbn.as_deref() {
        chips.push(format!("ISBN {}", escape_html(isbn)));
    }
    let chips: String = chips.iter().map(|c| format!("<span>{}</span>", c)).collect();

    let bookmarked = session.is_bookmarked(&book.slug);
    let bookmark_label = if bookmarked { "★ Bookmarked" } else { "☆ Bookmark" };

    let quote = summary
        .quote_of_the_book
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(|q| format!("<blockquote>“{}”</blockquote>", escape_html(q)))
        .unwrap_or_default();

    format!(
        r#"<div class="detail">
<div><img class="cover" src="{cover}" alt="{title}"></div>
<div>
<h1>{title}</h1>
<p>by <strong>{author}</strong></p>
<div class="chips">{chips}</div>
<p>{stars}</p>
<form method="post" action="/bookmarks/toggle">{slug_field}{return_field}<button type="submit" class="secondary">{bookmark_label}</button></form>
{quote}
</div>
</div>"#,
        cover = escape_html(cover),
        title = escape_html(&book.title),
        author = escape_html(&book.author),
        chips = chips,
        stars = layout::stars(summary.rating),
        slug_field = layout::hidden("slug", &book.slug),
        return_field = layout::hidden("return_to", &layout::book_href(&book.slug)),
        bookmark_label = bookmark_label,
        quote = quote,
    )
}

fn content_sections(summary: &Summary, images: &[(String, &SummaryImage)]) -> String {
    let mut html = String::new();

    html.push_str("<h2>📋 Executive Summary</h2>");
    html.push_str(&layout::paragraphs(summary.lead_text()));

    if let Some(who) = summary.who_should_read.as_deref().filter(|w| !w.trim().is_empty()) {
        html.push_str(r#"<div class="panel"><h3>🎯 Who Should Read This</h3>"#);
        html.push_str(&layout::paragraphs(who));
        html.push_str("</div>");
    }

    if !summary.key_takeaways.is_empty() {
        html.push_str("<h2>💡 Key Concepts</h2>");
        for (i, takeaway) in summary.key_takeaways.iter().enumerate() {
            let heading = if takeaway.title.is_empty() {
                format!("Key Insight {}", i + 1)
            } else {
                takeaway.title.clone()
            };
            html.push_str(&format!(
                r#"<div class="panel"><h3>{}. {}</h3>{}{}</div>"#,
                i + 1,
                escape_html(&heading),
                layout::paragraphs(&takeaway.text),
                render_mini_player(&format!("{}. {}", heading, takeaway.text), "Listen")
            ));
        }
    }

    if !summary.analogies.is_empty() {
        html.push_str("<h2>🧩 Visual Framework</h2>");
        for analogy in &summary.analogies {
            html.push_str(&format!(
                r#"<div class="panel"><h3>{}</h3><p><em>{}</em></p><p>{}</p></div>"#,
                escape_html(&analogy.concept),
                escape_html(&analogy.analogy),
                escape_html(&analogy.explanation)
            ));
        }
    }

    if !images.is_empty() {
        html.push_str(r#"<div class="grid">"#);
        for (url, image) in images {
            let alt = image
                .alt_text
                .as_deref()
                .or(image.section_title.as_deref())
                .unwrap_or("Concept illustration");
            let caption = image
                .caption
                .as_deref()
                .map(|c| format!(r#"<div class="meta">{}</div>"#, escape_html(c)))
                .unwrap_or_default();
            html.push_str(&format!(
                r#"<div class="card"><img src="{}" alt="{}" loading="lazy"><div class="body">{}</div></div>"#,
                escape_html(url),
                escape_html(alt),
                caption
            ));
        }
        html.push_str("</div>");
    }

    if !summary.main_content.trim().is_empty() {
        html.push_str("<h2>📖 Full Summary</h2>");
        html.push_str(&layout::paragraphs(&summary.main_content));
    }

    if !summary.action_steps.is_empty() {
        html.push_str("<h2>✅ Action Steps</h2><ol>");
        for step in &summary.action_steps {
            html.push_str(&format!("<li>{}</li>", escape_html(step)));
        }
        html.push_str("</ol>");
    }

    if !summary.quotes.is_empty() {
        html.push_str("<h2>💬 Quotes</h2>");
        for quote in summary.quotes.iter().take(MAX_QUOTES) {
            html.push_str(&format!("<blockquote>“{}”</blockquote>", escape_html(quote)));
        }
    }

    html
}

/// Text read aloud by the audio player: lead text plus the key concepts
fn listening_text(summary: &Summary) -> String {
    let mut text = summary.lead_text().to_string();
    for takeaway in &summary.key_takeaways {
        text.push_str("\n\n");
        if !takeaway.title.is_empty() {
            text.push_str(&takeaway.title);
            text.push_str(". ");
        }
        text.push_str(&takeaway.text);
    }
    text
}

fn audio_section(found: &BookWithGenre, summary: &Summary) -> String {
    let options = PlayerOptions {
        title: format!("Listen: {}", found.book.title),
        ..Default::default()
    };
    format!(
        r#"<h2>🎧 Listen to the Summary</h2>{}<p><a href="/ai?slug={}">🤖 More AI features: audio briefing and quiz</a></p>"#,
        render_audio_player(&listening_text(summary), &options),
        bookwise_common::text_utils::encode_query(&found.book.slug)
    )
}

fn progress_section(slug: &str, session: &SessionState) -> String {
    let progress = session.progress(slug);

    let mut html = format!(
        r#"<div class="panel"><h3>📈 Reading Progress: {}</h3><div class="progress-bar"><div style="width:{}%"></div></div><p class="meta">{}% complete</p>"#,
        progress.status(),
        progress.percentage,
        progress.percentage
    );

    for section in PROGRESS_SECTIONS {
        if progress.has_read(section) {
            html.push_str(&format!("<span class=\"chips\"><span>✓ {}</span></span>", section));
        } else {
            html.push_str(&format!(
                r#"<form method="post" action="/book/progress" style="display:inline">{}{}<button type="submit" class="secondary">Mark “{}” read</button></form> "#,
                layout::hidden("slug", slug),
                layout::hidden("section", section),
                section
            ));
        }
    }
    html.push_str("</div>");
    html
}

fn chat_section(state: &AppState, slug: &str, title: &str, session: &SessionState) -> String {
    let mut html = format!(
        r#"<div class="panel chat"><h3>🤖 Ask AI about “{}”</h3>"#,
        escape_html(title)
    );

    if !state.chat.is_configured() {
        html.push_str(&format!("<p>{}</p></div>", escape_html(NOT_CONFIGURED_MESSAGE)));
        return html;
    }

    for message in session.chat_history(slug) {
        let (class, who) = match message.role {
            ChatRole::User => ("user", "You"),
            ChatRole::Assistant => ("assistant", "AI"),
        };
        html.push_str(&format!(
            r#"<div class="message {}"><div class="meta">{} · {}</div>{}</div>"#,
            class,
            who,
            escape_html(&message.timestamp),
            layout::paragraphs(&message.content)
        ));
    }

    html.push_str(&format!(
        r#"<form method="post" action="/book/chat">{slug}<input type="text" name="message" placeholder="Ask anything about this book..." style="width:70%;padding:8px"> <button type="submit">Send</button></form>
<form method="post" action="/book/chat/clear" style="margin-top:8px">{slug}<button type="submit" class="secondary">Clear chat</button></form></div>"#,
        slug = layout::hidden("slug", slug)
    ));
    html
}

async fn related_sections(state: &AppState, found: &BookWithGenre) -> String {
    let catalog: Vec<CatalogEntry> = match state.caches.catalog(&state.db).await {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Catalog load failed for recommendations: {}", e);
            return "<h2>🔮 You Might Also Like</h2><p>Could not load recommendations.</p>".to_string();
        }
    };

    let Some(current) = catalog.iter().find(|e| e.book.id == found.book.id) else {
        return String::new();
    };

    let mut html = String::new();

    let recommendations = recommend::recommend(current, &catalog, RECOMMENDATION_LIMIT);
    debug!(slug = %found.book.slug, count = recommendations.len(), "Recommendations scored");
    if !recommendations.is_empty() {
        html.push_str("<h2>🔮 You Might Also Like</h2>");
        html.push_str(&recommendation_grid(state, &recommendations).await);
    }

    let same_genre = recommend::more_in_genre(current, &catalog, SAME_GENRE_LIMIT);
    if !same_genre.is_empty() {
        html.push_str(&format!(
            "<h2>📚 More in {}</h2>",
            escape_html(&found.genre.name)
        ));
        let covers = state.images.book_covers(&same_genre).await;
        html.push_str(&layout::book_grid(&same_genre, &covers));
    }

    html
}

/// Cards with the scoring reasons under each book
pub(crate) async fn recommendation_grid(state: &AppState, recommendations: &[Recommendation]) -> String {
    let books: Vec<_> = recommendations.iter().map(|r| r.book.clone()).collect();
    let covers = state.images.book_covers(&books).await;

    let cards: String = recommendations
        .iter()
        .zip(&covers)
        .map(|(rec, cover)| {
            let reasons = format!(
                r#"<div class="reasons">{}</div>"#,
                escape_html(&rec.reasons.join(" · "))
            );
            layout::book_card(&rec.book, cover, &reasons)
        })
        .collect();
    format!(r#"<div class="grid">{}</div>"#, cards)
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub slug: String,
    #[serde(default)]
    pub message: String,
}

/// POST /book/chat
pub async fn post_chat(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<ChatForm>,
) -> PageResult<Redirect> {
    let found = find_book(&state, &form.slug).await?;
    let redirect = Redirect::to(&layout::book_href(&found.book.slug));

    let message = form.message.trim();
    if message.is_empty() {
        return Ok(redirect);
    }

    let summary = queries::get_summary_for_book(&state.db, found.book.id).await?;
    let context = BookContext::new(&found.book, &found.genre, summary.as_ref());
    let history = state
        .sessions
        .snapshot(session)
        .await
        .chat_history(&found.book.slug)
        .to_vec();

    let reply = state.chat.reply_or_fallback(message, &context, &history).await;

    state
        .sessions
        .update(session, |s| {
            s.push_chat(&found.book.slug, ChatMessage::new(ChatRole::User, message));
            s.push_chat(&found.book.slug, ChatMessage::new(ChatRole::Assistant, reply));
        })
        .await;

    Ok(redirect)
}

#[derive(Debug, Deserialize)]
pub struct SlugForm {
    pub slug: String,
}

/// POST /book/chat/clear
pub async fn post_clear_chat(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<SlugForm>,
) -> Redirect {
    state.sessions.update(session, |s| s.clear_chat(&form.slug)).await;
    Redirect::to(&layout::book_href(&form.slug))
}

#[derive(Debug, Deserialize)]
pub struct ProgressForm {
    pub slug: String,
    pub section: String,
}

/// POST /book/progress
pub async fn post_progress(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<ProgressForm>,
) -> PageResult<Redirect> {
    let found = find_book(&state, &form.slug).await?;

    if PROGRESS_SECTIONS.contains(&form.section.as_str()) {
        state
            .sessions
            .update(session, |s| s.mark_section_read(&found.book.slug, &form.section))
            .await;
    } else {
        debug!(section = %form.section, "Ignoring unknown progress section");
    }

    Ok(Redirect::to(&layout::book_href(&found.book.slug)))
}
