//! Per-visitor state: bookmarks, reading progress, chat history, pagination
//!
//! One `SessionState` exists per browser session. It is owned by the web
//! server's session store and handed to handlers explicitly.

use crate::ai::ChatMessage;
use crate::pagination::PageState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Sections a reader can tick off on a book page
pub const PROGRESS_SECTIONS: [&str; 5] = [
    "Executive Summary",
    "Key Concepts",
    "Visual Framework",
    "Action Steps",
    "Quotes",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    pub slug: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingProgress {
    pub sections_read: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub percentage: u32,
}

impl ReadingProgress {
    pub fn has_read(&self, section: &str) -> bool {
        self.sections_read.iter().any(|s| s == section)
    }

    /// Record a section; repeat marks are ignored
    pub fn mark_read(&mut self, section: &str, total_sections: usize) {
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        if self.has_read(section) {
            return;
        }

        self.sections_read.push(section.to_string());
        let total = total_sections.max(1);
        self.percentage = (self.sections_read.len() * 100 / total) as u32;
        if self.percentage >= 100 && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
    }

    pub fn status(&self) -> &'static str {
        match self.percentage {
            p if p >= 100 => "✅ Completed",
            0 => "📚 Not Started",
            _ => "📖 In Progress",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    bookmarks: Vec<Bookmark>,
    progress: HashMap<String, ReadingProgress>,
    chat_history: HashMap<String, Vec<ChatMessage>>,
    pagination: HashMap<String, PageState>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // -- bookmarks --

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn bookmarked_slugs(&self) -> Vec<String> {
        self.bookmarks.iter().map(|b| b.slug.clone()).collect()
    }

    pub fn is_bookmarked(&self, slug: &str) -> bool {
        self.bookmarks.iter().any(|b| b.slug == slug)
    }

    /// Add a bookmark; a slug already present is left as is
    pub fn add_bookmark(&mut self, slug: &str, title: &str, author: &str) {
        if self.is_bookmarked(slug) {
            return;
        }
        self.bookmarks.push(Bookmark {
            slug: slug.to_string(),
            title: title.to_string(),
            author: author.to_string(),
        });
    }

    pub fn remove_bookmark(&mut self, slug: &str) {
        self.bookmarks.retain(|b| b.slug != slug);
    }

    /// Flip bookmark state; returns whether the book is now bookmarked
    pub fn toggle_bookmark(&mut self, slug: &str, title: &str, author: &str) -> bool {
        if self.is_bookmarked(slug) {
            self.remove_bookmark(slug);
            false
        } else {
            self.add_bookmark(slug, title, author);
            true
        }
    }

    // -- reading progress --

    pub fn progress(&self, slug: &str) -> ReadingProgress {
        self.progress.get(slug).cloned().unwrap_or_default()
    }

    pub fn mark_section_read(&mut self, slug: &str, section: &str) {
        self.progress
            .entry(slug.to_string())
            .or_default()
            .mark_read(section, PROGRESS_SECTIONS.len());
    }

    // -- chat --

    pub fn chat_history(&self, slug: &str) -> &[ChatMessage] {
        self.chat_history.get(slug).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push_chat(&mut self, slug: &str, message: ChatMessage) {
        self.chat_history
            .entry(slug.to_string())
            .or_default()
            .push(message);
    }

    pub fn clear_chat(&mut self, slug: &str) {
        self.chat_history.remove(slug);
    }

    // -- pagination --

    pub fn page_state(&self, key: &str) -> PageState {
        self.pagination.get(key).copied().unwrap_or_default()
    }

    pub fn page_state_mut(&mut self, key: &str) -> &mut PageState {
        self.pagination.entry(key.to_string()).or_default()
    }
}
