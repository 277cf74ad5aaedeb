//! About, privacy and terms pages

use axum::response::Html;

use super::layout;

/// GET /about
pub async fn about_page() -> Html<String> {
    layout::render_page(
        "About",
        "About BookWise",
        r#"<h1>ℹ️ About BookWise</h1>
<p>BookWise distills the world's most influential books into focused summaries you can read in minutes.</p>
<h2>What you get</h2>
<ul>
<li>Executive summaries and key concepts for every book</li>
<li>Analogies and frameworks that make ideas stick</li>
<li>Action steps you can apply today</li>
<li>Listen mode and an AI reading companion</li>
</ul>
<h2>How summaries are made</h2>
<p>Each summary is curated and reviewed before it is published. Ratings reflect the editorial team's view of a book's practical value.</p>"#,
    )
}

/// GET /privacy
pub async fn privacy_page() -> Html<String> {
    layout::render_page(
        "Privacy Policy",
        "BookWise privacy policy",
        r#"<h1>🔒 Privacy Policy</h1>
<p>BookWise does not require an account. Bookmarks, reading progress and chat history are kept in server memory for your browser session only and are discarded when the session expires.</p>
<p>A single cookie, <code>bookwise_session</code>, identifies your session. It is not used for tracking or advertising.</p>
<p>Questions you send to the AI companion are forwarded to the configured language model provider to produce an answer.</p>"#,
    )
}

/// GET /terms
pub async fn terms_page() -> Html<String> {
    layout::render_page(
        "Terms of Service",
        "BookWise terms of service",
        r#"<h1>📜 Terms of Service</h1>
<p>Summaries are provided for personal, educational use. They are not a substitute for the original works, and all rights to those works remain with their authors and publishers.</p>
<p>AI-generated answers may be inaccurate. Verify important information against the original book.</p>
<p>The service is provided as is, without warranty of any kind.</p>"#,
    )
}
