//! Content-based recommendations
//!
//! Books are scored against a reference book (or a reading history) using
//! shared genre, author, publication era and keyword overlap. Scoring works
//! on an already-loaded catalog and cannot fail.

use crate::db::models::{Book, CatalogEntry, Summary};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

pub const GENRE_WEIGHT: f64 = 40.0;
pub const SAME_AUTHOR_WEIGHT: f64 = 30.0;
pub const RELATED_AUTHOR_WEIGHT: f64 = 15.0;
pub const KEYWORD_WEIGHT: f64 = 30.0;
pub const ERA_WEIGHT: f64 = 5.0;
pub const MAX_KEYWORDS: usize = 50;
pub const MAX_REASONS: usize = 3;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-zA-Z]{4,}\b").expect("keyword pattern is valid"));

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has",
        "had", "do", "does", "did", "will", "would", "could", "should", "may", "might", "must",
        "shall", "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with",
        "at", "by", "from", "up", "about", "into", "over", "after", "and", "but", "or", "as",
        "if", "when", "than", "because", "while", "where", "so", "this", "that", "these",
        "those", "it", "its", "you", "your", "we", "our", "they", "their", "what", "which",
        "who", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some",
        "such", "no", "not", "only", "own", "same", "just", "also", "very", "much", "many",
    ]
    .into_iter()
    .collect()
});

/// A scored suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub book: Book,
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Unique keywords of four or more letters, stop words removed, in order of
/// first appearance, at most [`MAX_KEYWORDS`]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for m in WORD_RE.find_iter(&lowered) {
        let word = m.as_str();
        if STOP_WORDS.contains(word) || !seen.insert(word) {
            continue;
        }
        keywords.push(word.to_string());
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
    }

    keywords
}

/// Keywords for a book from its title, author and summary content
pub fn book_keywords(book: &Book, summary: Option<&Summary>) -> Vec<String> {
    let mut parts: Vec<&str> = vec![&book.title, &book.author];

    if let Some(summary) = summary {
        if let Some(text) = summary.executive_summary.as_deref() {
            parts.push(text);
        }
        parts.push(&summary.main_content);
        if let Some(text) = summary.who_should_read.as_deref() {
            parts.push(text);
        }
        for takeaway in &summary.key_takeaways {
            parts.push(&takeaway.title);
            parts.push(&takeaway.text);
        }
        for analogy in &summary.analogies {
            parts.push(&analogy.concept);
            parts.push(&analogy.analogy);
            parts.push(&analogy.explanation);
        }
        parts.extend(summary.quotes.iter().map(String::as_str));
        parts.extend(summary.action_steps.iter().map(String::as_str));
    }

    extract_keywords(&parts.join(" "))
}

/// |A ∩ B| / |A ∪ B|; zero when either side is empty
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Books similar to `current`, best first, at most `limit`
pub fn recommend(current: &CatalogEntry, catalog: &[CatalogEntry], limit: usize) -> Vec<Recommendation> {
    let current_keywords = book_keywords(&current.book, current.summary.as_ref());
    let current_author = current.book.author.to_lowercase();
    let author_tokens: Vec<&str> = current_author.split_whitespace().collect();

    let mut scored = Vec::new();

    for entry in catalog {
        if entry.book.id == current.book.id {
            continue;
        }

        let mut score = 0.0;
        let mut reasons = Vec::new();

        if entry.genre.slug == current.genre.slug {
            score += GENRE_WEIGHT;
            reasons.push(format!("Same genre: {}", entry.genre.name));
        }

        let other_author = entry.book.author.to_lowercase();
        if !current_author.is_empty() && !other_author.is_empty() {
            if other_author == current_author {
                score += SAME_AUTHOR_WEIGHT;
                reasons.push(format!("Same author: {}", entry.book.author));
            } else if author_tokens.iter().any(|t| other_author.contains(t)) {
                score += RELATED_AUTHOR_WEIGHT;
                reasons.push("Related author".to_string());
            }
        }

        if let Some(summary) = entry.summary.as_ref() {
            let similarity = jaccard(&current_keywords, &book_keywords(&entry.book, Some(summary)));
            let keyword_score = similarity * KEYWORD_WEIGHT;
            if keyword_score > 5.0 {
                score += keyword_score;
                if similarity > 0.2 {
                    reasons.push("Similar themes".to_string());
                } else if similarity > 0.1 {
                    reasons.push("Related topics".to_string());
                }
            }
        }

        if let (Some(a), Some(b)) = (current.book.publication_year, entry.book.publication_year) {
            if (a - b).abs() <= 5 {
                score += ERA_WEIGHT;
                reasons.push("Similar era".to_string());
            }
        }

        if score > 0.0 {
            reasons.truncate(MAX_REASONS);
            scored.push(Recommendation {
                book: entry.book.clone(),
                score,
                reasons,
            });
        }
    }

    rank(scored, limit)
}

/// Suggestions from a reading history given as book slugs
///
/// An empty history falls back to the best-rated books.
pub fn personalized(history: &[String], catalog: &[CatalogEntry], limit: usize) -> Vec<Recommendation> {
    if history.is_empty() {
        return top_rated(catalog, limit);
    }

    let history: HashSet<&str> = history.iter().map(String::as_str).collect();
    let mut genre_counts: HashMap<&str, usize> = HashMap::new();
    let mut authors: HashSet<String> = HashSet::new();
    let mut interests: HashSet<String> = HashSet::new();
    let mut read_ids: HashSet<i64> = HashSet::new();

    for entry in catalog.iter().filter(|e| history.contains(e.book.slug.as_str())) {
        read_ids.insert(entry.book.id);
        *genre_counts.entry(entry.genre.slug.as_str()).or_default() += 1;
        authors.insert(entry.book.author.to_lowercase());
        if let Some(summary) = entry.summary.as_ref() {
            interests.extend(book_keywords(&entry.book, Some(summary)));
        }
    }

    let mut scored = Vec::new();

    for entry in catalog {
        if read_ids.contains(&entry.book.id) {
            continue;
        }

        let mut score = 0.0;
        let mut reasons = Vec::new();

        let genre_count = genre_counts.get(entry.genre.slug.as_str()).copied().unwrap_or(0);
        if genre_count > 0 {
            score += 20.0 * genre_count as f64;
            reasons.push(format!("You like {}", entry.genre.name));
        }

        if authors.contains(&entry.book.author.to_lowercase()) {
            score += 25.0;
            reasons.push(format!("You've read {}", entry.book.author));
        }

        if !interests.is_empty() {
            if let Some(summary) = entry.summary.as_ref() {
                let overlap = book_keywords(&entry.book, Some(summary))
                    .iter()
                    .filter(|k| interests.contains(*k))
                    .count();
                if overlap > 5 {
                    score += ((overlap * 2) as f64).min(30.0);
                    reasons.push("Matches your interests".to_string());
                }
            }
        }

        if score > 0.0 {
            reasons.truncate(MAX_REASONS);
            scored.push(Recommendation {
                book: entry.book.clone(),
                score,
                reasons,
            });
        }
    }

    rank(scored, limit)
}

/// Best-rated books with a summary, each scored 100
pub fn top_rated(catalog: &[CatalogEntry], limit: usize) -> Vec<Recommendation> {
    let mut rated: Vec<(&Book, f64)> = catalog
        .iter()
        .filter_map(|e| e.summary.as_ref().map(|s| (&e.book, s.rating)))
        .collect();
    rated.sort_by(|a, b| b.1.total_cmp(&a.1));

    rated
        .into_iter()
        .take(limit)
        .map(|(book, _)| Recommendation {
            book: book.clone(),
            score: 100.0,
            reasons: vec!["Top Rated".to_string()],
        })
        .collect()
}

/// Other books in the same genre, catalog order
pub fn more_in_genre(current: &CatalogEntry, catalog: &[CatalogEntry], limit: usize) -> Vec<Book> {
    catalog
        .iter()
        .filter(|e| e.genre.id == current.genre.id && e.book.id != current.book.id)
        .take(limit)
        .map(|e| e.book.clone())
        .collect()
}

fn rank(mut scored: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    // stable: ties keep catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
