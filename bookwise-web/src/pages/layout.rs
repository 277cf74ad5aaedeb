//! Shared page chrome and HTML fragments

use axum::response::Html;
use bookwise_common::db::{Book, Genre};
use bookwise_common::pagination::PageButton;
use bookwise_common::text_utils::{encode_query, escape_html};

/// Wrap `body` in the site header, navigation and footer
pub fn render_page(title: &str, description: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | BookWise</title>
    <meta name="description" content="{description}">
    <link rel="stylesheet" href="/static/bookwise.css">
</head>
<body>
<header class="nav">
    <div class="inner">
        <a class="brand" href="/">📚 BookWise</a>
        <nav>
            <a href="/">Home</a>
            <a href="/categories">Categories</a>
            <a href="/reading-lists">Reading Lists</a>
            <a href="/bookmarks">Bookmarks</a>
            <a href="/random">🎲 Surprise Me</a>
            <a href="/about">About</a>
        </nav>
    </div>
</header>
<main>
{body}
</main>
<footer>
    <p>© {year} BookWise · <a href="/about">About</a> · <a href="/privacy">Privacy</a> · <a href="/terms">Terms</a></p>
</footer>
</body>
</html>"#,
        title = escape_html(title),
        description = escape_html(description),
        body = body,
        year = chrono::Utc::now().format("%Y"),
    ))
}

/// Centered icon + heading + message block
pub fn notice(icon: &str, title: &str, message: &str) -> String {
    format!(
        r#"<div class="notice"><div class="icon">{}</div><h1>{}</h1><p>{}</p><p><a class="button" href="/">Back to home</a></p></div>"#,
        icon,
        escape_html(title),
        escape_html(message)
    )
}

pub fn book_href(slug: &str) -> String {
    format!("/book?slug={}", encode_query(slug))
}

pub fn genre_href(slug: &str) -> String {
    format!("/categories?name={}", encode_query(slug))
}

/// Book tile; `extra` is appended inside the card body as-is
pub fn book_card(book: &Book, cover_url: &str, extra: &str) -> String {
    let year = book
        .publication_year
        .map(|y| format!("📖 {}", y))
        .unwrap_or_default();
    format!(
        r#"<div class="card"><a href="{href}"><img src="{cover}" alt="{title}" loading="lazy"></a><div class="body"><div class="title"><a href="{href}">{title}</a></div><div class="meta">{author}</div><div class="meta">{year}</div>{extra}</div></div>"#,
        href = book_href(&book.slug),
        cover = escape_html(cover_url),
        title = escape_html(&book.title),
        author = escape_html(&book.author),
        year = year,
        extra = extra,
    )
}

/// Grid of book tiles; `covers` is parallel to `books`
pub fn book_grid(books: &[Book], covers: &[String]) -> String {
    let cards: String = books
        .iter()
        .zip(covers)
        .map(|(book, cover)| book_card(book, cover, ""))
        .collect();
    format!(r#"<div class="grid">{}</div>"#, cards)
}

pub fn genre_card(genre: &Genre, book_count: Option<i64>) -> String {
    let count = book_count
        .map(|n| format!(r#"<div class="meta">{} books</div>"#, n))
        .unwrap_or_default();
    format!(
        r#"<a class="card genre-card" href="{href}"><div class="icon">{icon}</div><div class="title">{name}</div>{count}</a>"#,
        href = genre_href(&genre.slug),
        icon = escape_html(&genre.icon),
        name = escape_html(&genre.name),
        count = count,
    )
}

/// Pagination bar; `href_for` builds the link for a page number
pub fn pagination_nav(buttons: &[PageButton], href_for: impl Fn(usize) -> String) -> String {
    if buttons.is_empty() {
        return String::new();
    }

    let mut html = String::from(r#"<nav class="pagination">"#);
    for button in buttons {
        match *button {
            PageButton::Prev(page) => {
                html.push_str(&format!(r#"<a href="{}">← Prev</a>"#, href_for(page)))
            }
            PageButton::Next(page) => {
                html.push_str(&format!(r#"<a href="{}">Next →</a>"#, href_for(page)))
            }
            PageButton::Page { number, current: true } => {
                html.push_str(&format!(r#"<span class="current">{}</span>"#, number))
            }
            PageButton::Page { number, current: false } => {
                html.push_str(&format!(r#"<a href="{}">{}</a>"#, href_for(number), number))
            }
            PageButton::Ellipsis => html.push_str("<span>…</span>"),
        }
    }
    html.push_str("</nav>");
    html
}

/// Escaped paragraphs; blank lines separate paragraphs
pub fn paragraphs(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", escape_html(p).replace('\n', "<br>")))
        .collect()
}

/// Five-star rating, rounded to the nearest whole star
pub fn stars(rating: f64) -> String {
    let filled = rating.clamp(0.0, 5.0).round() as usize;
    format!("{}{} {:.1}", "★".repeat(filled), "☆".repeat(5 - filled), rating)
}

/// Hidden form field
pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape_html(value)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_escape_and_split() {
        assert_eq!(
            paragraphs("a <b>\n\nsecond\nline"),
            "<p>a &lt;b&gt;</p><p>second<br>line</p>"
        );
        assert_eq!(paragraphs("  \n\n "), "");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4.6), "★★★★★ 4.6");
        assert_eq!(stars(0.0), "☆☆☆☆☆ 0.0");
    }

    #[test]
    fn test_pagination_nav_links() {
        let buttons = [
            PageButton::Prev(1),
            PageButton::Page { number: 1, current: false },
            PageButton::Page { number: 2, current: true },
            PageButton::Next(3),
        ];
        let html = pagination_nav(&buttons, |p| format!("?page={}", p));
        assert!(html.contains(r#"<a href="?page=1">← Prev</a>"#));
        assert!(html.contains(r#"<span class="current">2</span>"#));
        assert!(html.contains(r#"<a href="?page=3">Next →</a>"#));
        assert!(pagination_nav(&[], |p| p.to_string()).is_empty());
    }
}
