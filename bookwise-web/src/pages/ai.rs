//! AI features page: audio briefing and comprehension quiz for one book

use axum::{
    extract::{Query, State},
    response::Html,
};
use bookwise_common::ai::{BookContext, NOT_CONFIGURED_MESSAGE};
use bookwise_common::db::queries;
use bookwise_common::text_utils::escape_html;
use bookwise_common::tts::{estimated_minutes, render_audio_player, word_count, PlayerOptions};
use serde::Deserialize;

use super::{book::find_book, layout};
use crate::{AppState, PageResult};

const QUIZ_QUESTIONS: usize = 5;

#[derive(Debug, Default, Deserialize)]
pub struct AiQuery {
    pub slug: Option<String>,
}

/// GET /ai?slug=
pub async fn ai_page(
    State(state): State<AppState>,
    Query(params): Query<AiQuery>,
) -> PageResult<Html<String>> {
    let Some(slug) = params.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
        return picker(&state).await;
    };

    let found = find_book(&state, slug).await?;
    let summary = queries::get_summary_for_book(&state.db, found.book.id).await?;
    let context = BookContext::new(&found.book, &found.genre, summary.as_ref());

    let mut body = format!(
        r#"<p><a href="{}">← Back to the book</a></p><h1>🤖 AI Features: {}</h1>"#,
        layout::book_href(&found.book.slug),
        escape_html(&found.book.title)
    );

    if !state.chat.is_configured() {
        body.push_str(&format!(r#"<div class="panel"><p>{}</p></div>"#, escape_html(NOT_CONFIGURED_MESSAGE)));
    }

    // Falls back to the stored summary text without a key
    let briefing = state.chat.summarize_for_audio(&context).await;
    body.push_str(&format!(
        r#"<h2>🎧 Audio Briefing</h2><p class="meta">{} words · about {:.1} min</p>"#,
        word_count(&briefing),
        estimated_minutes(&briefing)
    ));
    body.push_str(&render_audio_player(
        &briefing,
        &PlayerOptions {
            title: format!("Briefing: {}", found.book.title),
            ..Default::default()
        },
    ));

    body.push_str("<h2>📝 Test Your Understanding</h2>");
    let quiz = state.chat.generate_quiz(&context, QUIZ_QUESTIONS).await;
    if quiz.is_empty() {
        body.push_str("<p>The quiz is not available right now.</p>");
    }
    for (i, question) in quiz.iter().enumerate() {
        let options: String = question
            .options
            .iter()
            .map(|o| format!("<li>{}</li>", escape_html(o)))
            .collect();
        body.push_str(&format!(
            r#"<div class="panel"><h3>{}. {}</h3><ul>{}</ul><details><summary>Show answer</summary><p><strong>{}</strong> {}</p></details></div>"#,
            i + 1,
            escape_html(&question.question),
            options,
            escape_html(&question.correct),
            escape_html(&question.explanation)
        ));
    }

    Ok(layout::render_page(
        &format!("AI Features: {}", found.book.title),
        "Audio briefing and quiz",
        &body,
    ))
}

async fn picker(state: &AppState) -> PageResult<Html<String>> {
    let books = state.caches.books(&state.db).await?;
    let options: String = books
        .iter()
        .map(|b| {
            format!(
                r#"<option value="{}">{} ({})</option>"#,
                escape_html(&b.slug),
                escape_html(&b.title),
                escape_html(&b.author)
            )
        })
        .collect();

    let body = format!(
        r#"<h1>🤖 AI Features</h1><p>Pick a book for an audio briefing and a quick quiz.</p>
<form method="get" action="/ai" class="filters"><select name="slug">{}</select><button type="submit">Go</button></form>"#,
        options
    );
    Ok(layout::render_page("AI Features", "Audio briefings and quizzes", &body))
}
