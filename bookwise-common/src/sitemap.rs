//! sitemap.xml and robots.txt generation

use chrono::NaiveDate;
use serde::Serialize;

/// Static pages: (path, priority, change frequency)
const STATIC_PAGES: [(&str, &str, &str); 5] = [
    ("/", "1.0", "daily"),
    ("/categories", "0.9", "weekly"),
    ("/about", "0.6", "monthly"),
    ("/privacy", "0.3", "yearly"),
    ("/terms", "0.3", "yearly"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SitemapStats {
    pub static_pages: usize,
    pub genre_pages: usize,
    pub book_pages: usize,
    pub total_urls: usize,
}

pub fn sitemap_stats(genre_count: usize, book_count: usize) -> SitemapStats {
    SitemapStats {
        static_pages: STATIC_PAGES.len(),
        genre_pages: genre_count,
        book_pages: book_count,
        total_urls: STATIC_PAGES.len() + genre_count + book_count,
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn push_url(xml: &mut String, loc: &str, lastmod: &str, changefreq: &str, priority: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
    xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    xml.push_str(&format!("    <priority>{}</priority>\n", priority));
    xml.push_str("  </url>\n");
}

/// Build the sitemap from genre and book slugs
pub fn generate_sitemap<G, B>(base_url: &str, genre_slugs: G, book_slugs: B, today: NaiveDate) -> String
where
    G: IntoIterator,
    G::Item: AsRef<str>,
    B: IntoIterator,
    B::Item: AsRef<str>,
{
    let base_url = base_url.trim_end_matches('/');
    let lastmod = today.format("%Y-%m-%d").to_string();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for (path, priority, changefreq) in STATIC_PAGES {
        push_url(&mut xml, &format!("{}{}", base_url, path), &lastmod, changefreq, priority);
    }

    for slug in genre_slugs {
        let loc = format!("{}/categories?name={}", base_url, slug.as_ref());
        push_url(&mut xml, &loc, &lastmod, "weekly", "0.8");
    }

    for slug in book_slugs {
        let loc = format!("{}/book?slug={}", base_url, slug.as_ref());
        push_url(&mut xml, &loc, &lastmod, "monthly", "0.7");
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn generate_robots_txt(base_url: &str, today: NaiveDate) -> String {
    format!(
        "# BookWise robots.txt\n\
         # Generated: {}\n\
         \n\
         User-agent: *\n\
         Allow: /\n\
         Disallow: /admin/\n\
         Disallow: /api/\n\
         \n\
         Sitemap: {}/sitemap.xml\n\
         \n\
         Crawl-delay: 1\n",
        today.format("%Y-%m-%d"),
        base_url.trim_end_matches('/')
    )
}
