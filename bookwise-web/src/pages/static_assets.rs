//! Shared stylesheet

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

const BOOKWISE_CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Inter', 'Segoe UI', sans-serif; background: #f8fafc; color: #1e293b; line-height: 1.6; }
a { color: #667eea; text-decoration: none; }
a:hover { text-decoration: underline; }
header.nav { background: #fff; border-bottom: 1px solid #e2e8f0; position: sticky; top: 0; z-index: 10; }
header.nav .inner { max-width: 1200px; margin: 0 auto; padding: 0 24px; height: 64px; display: flex; align-items: center; justify-content: space-between; }
header.nav .brand { font-size: 24px; font-weight: 800; color: #4c51bf; }
header.nav nav a { margin-left: 24px; color: #64748b; font-weight: 500; }
main { max-width: 1200px; margin: 0 auto; padding: 32px 24px 64px; }
h1 { font-size: 32px; margin-bottom: 12px; }
h2 { font-size: 24px; margin: 32px 0 16px; }
h3 { font-size: 18px; margin: 16px 0 8px; }
p { margin-bottom: 12px; }
.hero { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; border-radius: 16px; padding: 48px 32px; text-align: center; }
.hero h1 { font-size: 40px; }
.search { margin-top: 24px; display: flex; gap: 8px; justify-content: center; }
.search input[type=text] { width: 420px; max-width: 100%; padding: 12px 16px; border-radius: 12px; border: 2px solid #e2e8f0; font-size: 15px; }
button, .button { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #fff; border: none; border-radius: 8px; padding: 10px 18px; font-weight: 600; cursor: pointer; display: inline-block; }
button.secondary { background: #e2e8f0; color: #1e293b; }
.stats { display: flex; gap: 16px; margin: 24px 0; }
.stats .stat { flex: 1; background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 16px; text-align: center; }
.stats .value { font-size: 28px; font-weight: 800; color: #4c51bf; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 20px; }
.card { background: #fff; border: 1px solid #e2e8f0; border-radius: 16px; overflow: hidden; }
.card img { width: 100%; aspect-ratio: 2 / 3; object-fit: cover; background: #e2e8f0; }
.card .body { padding: 12px 14px; }
.card .title { font-weight: 700; font-size: 14px; }
.card .meta { font-size: 12px; color: #64748b; }
.card .reasons { font-size: 11px; color: #4c51bf; margin-top: 6px; }
.genre-card { padding: 20px; text-align: center; }
.genre-card .icon { font-size: 36px; }
.chips span { display: inline-block; background: #eef2ff; color: #4c51bf; border-radius: 999px; padding: 2px 10px; margin: 0 6px 6px 0; font-size: 12px; }
.detail { display: grid; grid-template-columns: 240px 1fr; gap: 32px; }
.detail img.cover { width: 100%; border-radius: 12px; }
blockquote { border-left: 4px solid #667eea; padding: 8px 16px; color: #475569; font-style: italic; margin: 16px 0; }
.panel { background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; margin: 16px 0; }
.notice { text-align: center; padding: 64px 16px; }
.notice .icon { font-size: 48px; }
.pagination { display: flex; gap: 6px; justify-content: center; margin: 24px 0; flex-wrap: wrap; }
.pagination a, .pagination span { padding: 6px 12px; border-radius: 8px; border: 1px solid #e2e8f0; background: #fff; }
.pagination .current { background: #667eea; color: #fff; border-color: #667eea; }
.filters { display: flex; gap: 12px; align-items: end; margin-bottom: 16px; flex-wrap: wrap; }
.filters select { padding: 8px; border-radius: 8px; border: 1px solid #e2e8f0; }
.chat .message { padding: 8px 12px; border-radius: 8px; margin-bottom: 8px; }
.chat .user { background: #eef2ff; }
.chat .assistant { background: #f1f5f9; }
.progress-bar { height: 8px; background: #e2e8f0; border-radius: 4px; overflow: hidden; }
.progress-bar > div { height: 100%; background: #667eea; }
footer { text-align: center; color: #94a3b8; font-size: 13px; padding: 32px 0; border-top: 1px solid #e2e8f0; }
"#;

/// GET /static/bookwise.css
pub async fn serve_bookwise_css() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        BOOKWISE_CSS,
    )
        .into_response()
}
