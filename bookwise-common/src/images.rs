//! Cover and illustration URL checking with placeholder fallback
//!
//! Many hosts reject bare HEAD requests or non-browser clients, so probes
//! send a desktop browser user agent and retry as GET when HEAD errors out.

use crate::config::ImageConfig;
use crate::db::models::Book;
use crate::Result;
use futures::future::join_all;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const MEMO_CAPACITY: usize = 1024;

/// What an image is used for; selects the placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Book,
    Concept,
    Takeaway,
    Genre,
}

impl ImageKind {
    /// Parse a kind name; anything unknown is treated as a book cover
    pub fn from_name(name: &str) -> Self {
        match name {
            "concept" => ImageKind::Concept,
            "takeaway" => ImageKind::Takeaway,
            "genre" => ImageKind::Genre,
            _ => ImageKind::Book,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            ImageKind::Book => "https://placehold.co/300x450/EEE/31343C?text=Book+Cover",
            ImageKind::Concept => {
                "https://images.unsplash.com/photo-1456324504439-367cee3b3c32?w=800"
            }
            ImageKind::Takeaway => {
                "https://images.unsplash.com/photo-1522071820081-009f0129c71c?w=800"
            }
            ImageKind::Genre => "https://images.unsplash.com/photo-1481627834876-b7833e8f5570?w=600",
        }
    }
}

/// Outcome of probing one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable(String),
}

impl Reachability {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Reachability::Reachable)
    }
}

/// Memoizing image URL prober
pub struct ImageChecker {
    http_client: reqwest::Client,
    verify: bool,
    memo: RwLock<HashMap<String, bool>>,
}

impl ImageChecker {
    pub fn new(config: &ImageConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            verify: config.verify,
            memo: RwLock::new(HashMap::new()),
        })
    }

    /// Probe without consulting the memo
    ///
    /// HEAD first; a HEAD that fails to complete is retried as GET. Only a
    /// 200 response counts as reachable.
    pub async fn probe(&self, url: &str) -> Reachability {
        debug!(url = %url, "Probing image URL");

        let head_error = match self.http_client.head(url).send().await {
            Ok(response) => return status_reachability(response.status()),
            Err(e) => e,
        };

        debug!(url = %url, error = %head_error, "HEAD failed, retrying as GET");
        match self.http_client.get(url).send().await {
            Ok(response) => status_reachability(response.status()),
            Err(e) => Reachability::Unreachable(e.to_string()),
        }
    }

    /// Memoized reachability check; never fails
    pub async fn check(&self, url: &str) -> bool {
        if let Some(&known) = self.memo.read().await.get(url) {
            return known;
        }

        let reachable = self.probe(url).await.is_reachable();

        let mut memo = self.memo.write().await;
        if memo.len() >= MEMO_CAPACITY {
            memo.clear();
        }
        memo.insert(url.to_string(), reachable);
        reachable
    }

    /// The URL when present and reachable, otherwise the placeholder for `kind`
    ///
    /// With verification disabled any present URL is used as-is.
    pub async fn load_image_safe(&self, url: Option<&str>, kind: ImageKind) -> String {
        match url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) if !self.verify || self.check(url).await => url.to_string(),
            _ => kind.placeholder().to_string(),
        }
    }

    /// `load_image_safe` for several images at once, in input order
    pub async fn load_images_safe(&self, images: &[(Option<&str>, ImageKind)]) -> Vec<String> {
        join_all(images.iter().map(|&(url, kind)| self.load_image_safe(url, kind))).await
    }

    /// Cover for a book: primary URL, stored fallback, Open Library by ISBN,
    /// then the placeholder
    pub async fn book_cover(&self, book: &Book) -> String {
        let from_isbn = book
            .isbn
            .as_deref()
            .map(str::trim)
            .filter(|isbn| !isbn.is_empty())
            .map(|isbn| open_library_cover(isbn, 'L'));

        for candidate in [book.cover_image_url.clone(), book.cover_image_fallback.clone(), from_isbn] {
            if let Some(url) = candidate.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
                if !self.verify || self.check(url).await {
                    return url.to_string();
                }
            }
        }
        ImageKind::Book.placeholder().to_string()
    }

    /// Covers for several books, probed concurrently, in input order
    pub async fn book_covers(&self, books: &[Book]) -> Vec<String> {
        join_all(books.iter().map(|book| self.book_cover(book))).await
    }
}

fn status_reachability(status: reqwest::StatusCode) -> Reachability {
    if status == reqwest::StatusCode::OK {
        Reachability::Reachable
    } else {
        Reachability::Unreachable(format!("HTTP {}", status.as_u16()))
    }
}

/// Open Library cover URL for an ISBN; size is S, M or L
pub fn open_library_cover(isbn: &str, size: char) -> String {
    let size = match size.to_ascii_uppercase() {
        s @ ('S' | 'M' | 'L') => s,
        _ => 'L',
    };
    format!("https://covers.openlibrary.org/b/isbn/{}-{}.jpg", isbn.trim(), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unverified() -> ImageChecker {
        ImageChecker::new(&ImageConfig {
            verify: false,
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_unknown_kind_falls_back_to_book() {
        assert_eq!(ImageKind::from_name("concept"), ImageKind::Concept);
        assert_eq!(ImageKind::from_name("poster"), ImageKind::Book);
        assert_eq!(
            ImageKind::from_name("???").placeholder(),
            "https://placehold.co/300x450/EEE/31343C?text=Book+Cover"
        );
    }

    #[tokio::test]
    async fn test_missing_url_gets_placeholder() {
        let checker = unverified();
        assert_eq!(
            checker.load_image_safe(None, ImageKind::Genre).await,
            ImageKind::Genre.placeholder()
        );
        assert_eq!(
            checker.load_image_safe(Some("   "), ImageKind::Takeaway).await,
            ImageKind::Takeaway.placeholder()
        );
    }

    #[tokio::test]
    async fn test_unverified_url_used_as_is() {
        let checker = unverified();
        assert_eq!(
            checker
                .load_image_safe(Some("https://covers.example/x.jpg"), ImageKind::Book)
                .await,
            "https://covers.example/x.jpg"
        );
    }

    #[test]
    fn test_open_library_cover() {
        assert_eq!(
            open_library_cover("9780735211292", 'm'),
            "https://covers.openlibrary.org/b/isbn/9780735211292-M.jpg"
        );
        assert_eq!(
            open_library_cover("123", 'x'),
            "https://covers.openlibrary.org/b/isbn/123-L.jpg"
        );
    }

    fn book(cover: Option<&str>, isbn: Option<&str>) -> Book {
        let stamp = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Book {
            id: 1,
            title: "Atomic Habits".into(),
            author: "James Clear".into(),
            slug: "atomic-habits".into(),
            cover_image_url: cover.map(String::from),
            cover_image_fallback: None,
            isbn: isbn.map(String::from),
            publication_year: None,
            genre_id: 1,
            is_featured: false,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[tokio::test]
    async fn test_book_cover_candidates() {
        let checker = unverified();
        assert_eq!(
            checker.book_cover(&book(Some("https://covers.example/a.jpg"), Some("9780735211292"))).await,
            "https://covers.example/a.jpg"
        );
        assert_eq!(
            checker.book_cover(&book(None, Some("9780735211292"))).await,
            "https://covers.openlibrary.org/b/isbn/9780735211292-L.jpg"
        );
        assert_eq!(
            checker.book_cover(&book(None, None)).await,
            ImageKind::Book.placeholder()
        );
    }
}
