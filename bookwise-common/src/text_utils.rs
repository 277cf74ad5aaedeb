//! Small text helpers shared by pages and the admin tool

/// URL-safe slug: lowercase, words joined by `-`, punctuation dropped, `&` spelled out
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c == '&' {
            if !slug.is_empty() {
                pending_dash = true;
            }
            push_word(&mut slug, &mut pending_dash, "and");
            pending_dash = true;
        } else if c.is_alphanumeric() {
            let lower: String = c.to_lowercase().collect();
            push_word(&mut slug, &mut pending_dash, &lower);
        } else if c.is_whitespace() || c == '-' || c == '_' || c == '/' {
            if !slug.is_empty() {
                pending_dash = true;
            }
        }
        // anything else (apostrophes, colons, commas) is dropped in place
    }

    slug
}

fn push_word(slug: &mut String, pending_dash: &mut bool, word: &str) {
    if *pending_dash && !slug.is_empty() {
        slug.push('-');
    }
    *pending_dash = false;
    slug.push_str(word);
}

pub fn format_reading_time(minutes: i64) -> String {
    match minutes {
        m if m < 1 => "< 1 min read".to_string(),
        1 => "1 min read".to_string(),
        m => format!("{} min read", m),
    }
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Percent-encode a query parameter value
pub fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Cut `text` to at most `max_chars` characters, adding an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_titles() {
        assert_eq!(slugify("Atomic Habits"), "atomic-habits");
        assert_eq!(slugify("Man's Search for Meaning"), "mans-search-for-meaning");
        assert_eq!(slugify("Zero to One: Notes on Startups"), "zero-to-one-notes-on-startups");
        assert_eq!(slugify("Sales & Marketing"), "sales-and-marketing");
        assert_eq!(slugify("  Self   Help  "), "self-help");
        assert_eq!(slugify("The 4-Hour Workweek"), "the-4-hour-workweek");
        assert_eq!(
            slugify("The Subtle Art of Not Giving a F*ck"),
            "the-subtle-art-of-not-giving-a-fck"
        );
    }

    #[test]
    fn test_format_reading_time() {
        assert_eq!(format_reading_time(0), "< 1 min read");
        assert_eq!(format_reading_time(1), "1 min read");
        assert_eq!(format_reading_time(15), "15 min read");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("deep work"), "deep+work");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer sentence", 8), "a longer...");
    }
}
