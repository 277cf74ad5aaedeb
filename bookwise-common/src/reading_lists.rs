//! Curated reading lists
//!
//! Lists name books by slug. Slugs with no matching row are skipped when a
//! list is resolved, so lists can reference books not yet in the catalog.

use crate::db::models::Book;
use crate::db::queries;
use crate::Result;
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingList {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub books: &'static [&'static str],
}

pub const READING_LISTS: [ReadingList; 6] = [
    ReadingList {
        id: "startup-essentials",
        title: "Startup Essentials",
        description: "Must-read books for entrepreneurs and startup founders",
        icon: "🚀",
        books: &[
            "the-lean-startup",
            "zero-to-one",
            "the-hard-thing-about-hard-things",
            "the-innovators-dilemma",
            "good-to-great",
            "start-with-why",
        ],
    },
    ReadingList {
        id: "productivity-masters",
        title: "Productivity Masters",
        description: "Transform your output with these time-tested strategies",
        icon: "⚡",
        books: &[
            "atomic-habits",
            "deep-work",
            "getting-things-done",
            "the-4-hour-workweek",
            "essentialism",
            "make-time",
        ],
    },
    ReadingList {
        id: "wealth-building",
        title: "Wealth Building",
        description: "Master your finances and build lasting wealth",
        icon: "💰",
        books: &[
            "the-psychology-of-money",
            "rich-dad-poor-dad",
            "think-and-grow-rich",
            "the-intelligent-investor",
            "the-millionaire-next-door",
            "your-money-or-your-life",
        ],
    },
    ReadingList {
        id: "mindset-shift",
        title: "Mindset Shift",
        description: "Rewire your thinking for success and happiness",
        icon: "🧠",
        books: &[
            "mindset",
            "thinking-fast-and-slow",
            "the-power-of-now",
            "mans-search-for-meaning",
            "the-subtle-art-of-not-giving-a-fck",
            "grit",
        ],
    },
    ReadingList {
        id: "leadership-excellence",
        title: "Leadership Excellence",
        description: "Develop the skills to lead teams and organizations",
        icon: "👔",
        books: &[
            "the-7-habits-of-highly-effective-people",
            "how-to-win-friends-and-influence-people",
            "extreme-ownership",
            "leaders-eat-last",
            "the-five-dysfunctions-of-a-team",
            "primal-leadership",
        ],
    },
    ReadingList {
        id: "stoic-wisdom",
        title: "Stoic Wisdom",
        description: "Ancient philosophy for modern challenges",
        icon: "🏛️",
        books: &[
            "meditations",
            "the-daily-stoic",
            "letters-from-a-stoic",
            "the-obstacle-is-the-way",
            "ego-is-the-enemy",
            "mans-search-for-meaning",
        ],
    },
];

pub fn all_lists() -> &'static [ReadingList] {
    &READING_LISTS
}

pub fn find_list(id: &str) -> Option<&'static ReadingList> {
    READING_LISTS.iter().find(|list| list.id == id)
}

/// The list's books that exist in the database, in list order
pub async fn resolve_list(pool: &SqlitePool, list: &ReadingList) -> Result<Vec<Book>> {
    queries::get_books_by_slugs(pool, list.books).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_six_lists_with_unique_ids() {
        let ids: HashSet<&str> = all_lists().iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), 6);
        assert!(all_lists().iter().all(|l| l.books.len() == 6));
    }

    #[test]
    fn test_find_list() {
        let list = find_list("stoic-wisdom").unwrap();
        assert_eq!(list.books[0], "meditations");
        assert!(find_list("unknown").is_none());
    }

    #[test]
    fn test_slugs_are_slugified() {
        for list in all_lists() {
            for slug in list.books {
                assert_eq!(crate::text_utils::slugify(slug), *slug);
            }
        }
    }
}
