//! Database models
//!
//! Rows are detached owned structs. JSON list columns on `summaries` are
//! decoded once, when a [`SummaryRow`] becomes a [`Summary`].

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_GENRE_ICON: &str = "📚";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: String,
    pub image_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub slug: String,
    pub cover_image_url: Option<String>,
    pub cover_image_fallback: Option<String>,
    pub isbn: Option<String>,
    pub publication_year: Option<i64>,
    pub genre_id: i64,
    pub is_featured: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A book joined with the genre it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookWithGenre {
    pub book: Book,
    pub genre: Genre,
}

/// Key takeaway from a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTakeaway")]
pub struct Takeaway {
    pub title: String,
    pub text: String,
}

// Older rows store takeaways as bare strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTakeaway {
    Bare(String),
    Full {
        #[serde(default)]
        title: String,
        #[serde(default, alias = "description")]
        text: String,
    },
}

impl From<RawTakeaway> for Takeaway {
    fn from(raw: RawTakeaway) -> Self {
        match raw {
            RawTakeaway::Bare(text) => Takeaway {
                title: String::new(),
                text,
            },
            RawTakeaway::Full { title, text } => Takeaway { title, text },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Analogy {
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub analogy: String,
    #[serde(default)]
    pub explanation: String,
}

/// Raw `summaries` row, JSON columns still encoded
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SummaryRow {
    pub id: i64,
    pub book_id: i64,
    pub overview_text: String,
    pub main_content: String,
    pub key_takeaways: Option<String>,
    pub who_should_read: Option<String>,
    pub difficulty: String,
    pub reading_time: i64,
    pub rating: f64,
    pub executive_summary: Option<String>,
    pub quote_of_the_book: Option<String>,
    pub analogies: Option<String>,
    pub quotes: Option<String>,
    pub action_steps: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub workflow_data: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub id: i64,
    pub book_id: i64,
    pub overview_text: String,
    pub main_content: String,
    pub key_takeaways: Vec<Takeaway>,
    pub who_should_read: Option<String>,
    pub difficulty: String,
    pub reading_time: i64,
    pub rating: f64,
    pub executive_summary: Option<String>,
    pub quote_of_the_book: Option<String>,
    pub analogies: Vec<Analogy>,
    pub quotes: Vec<String>,
    pub action_steps: Vec<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub workflow_data: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SummaryRow> for Summary {
    fn from(row: SummaryRow) -> Self {
        let book_id = row.book_id;
        Summary {
            id: row.id,
            book_id,
            key_takeaways: decode_list(row.key_takeaways.as_deref(), "key_takeaways", book_id),
            analogies: decode_list(row.analogies.as_deref(), "analogies", book_id),
            quotes: decode_list(row.quotes.as_deref(), "quotes", book_id),
            action_steps: decode_list(row.action_steps.as_deref(), "action_steps", book_id),
            overview_text: row.overview_text,
            main_content: row.main_content,
            who_should_read: row.who_should_read,
            difficulty: row.difficulty,
            reading_time: row.reading_time,
            rating: row.rating,
            executive_summary: row.executive_summary,
            quote_of_the_book: row.quote_of_the_book,
            seo_title: row.seo_title,
            seo_description: row.seo_description,
            workflow_data: row.workflow_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Summary {
    /// Executive summary if present, otherwise the overview
    pub fn lead_text(&self) -> &str {
        match self.executive_summary.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => &self.overview_text,
        }
    }
}

/// Decode a JSON list column; malformed content yields an empty list
fn decode_list<T: DeserializeOwned>(raw: Option<&str>, field: &str, book_id: i64) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!("Undecodable {} for book {}: {}", field, book_id, e);
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SummaryImage {
    pub id: i64,
    pub summary_id: i64,
    pub image_url: String,
    pub section_type: String,
    pub section_title: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub display_order: i64,
}

/// Everything the recommender needs to know about one book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub book: Book,
    pub genre: Genre,
    pub summary: Option<Summary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(takeaways: Option<&str>, analogies: Option<&str>) -> SummaryRow {
        let now = chrono::Utc::now().naive_utc();
        SummaryRow {
            id: 1,
            book_id: 7,
            overview_text: "Overview".into(),
            main_content: "Main".into(),
            key_takeaways: takeaways.map(String::from),
            who_should_read: None,
            difficulty: "intermediate".into(),
            reading_time: 10,
            rating: 4.5,
            executive_summary: None,
            quote_of_the_book: None,
            analogies: analogies.map(String::from),
            quotes: Some(r#"["one","two"]"#.into()),
            action_steps: None,
            seo_title: None,
            seo_description: None,
            workflow_data: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_takeaways_accept_objects_and_bare_strings() {
        let summary = Summary::from(row(
            Some(r#"[{"title":"Habits","text":"Compound"}, "Just text"]"#),
            None,
        ));

        assert_eq!(summary.key_takeaways.len(), 2);
        assert_eq!(summary.key_takeaways[0].title, "Habits");
        assert_eq!(summary.key_takeaways[0].text, "Compound");
        assert_eq!(summary.key_takeaways[1].title, "");
        assert_eq!(summary.key_takeaways[1].text, "Just text");
        assert_eq!(summary.quotes, vec!["one", "two"]);
        assert!(summary.action_steps.is_empty());
    }

    #[test]
    fn test_malformed_json_yields_empty_list() {
        let summary = Summary::from(row(Some("{not json"), Some(r#"{"concept":"x"}"#)));
        assert!(summary.key_takeaways.is_empty());
        assert!(summary.analogies.is_empty());
    }

    #[test]
    fn test_analogy_missing_fields_default() {
        let summary = Summary::from(row(None, Some(r#"[{"concept":"Flywheel"}]"#)));
        assert_eq!(summary.analogies.len(), 1);
        assert_eq!(summary.analogies[0].concept, "Flywheel");
        assert_eq!(summary.analogies[0].explanation, "");
    }

    #[test]
    fn test_lead_text_prefers_executive_summary() {
        let mut summary = Summary::from(row(None, None));
        assert_eq!(summary.lead_text(), "Overview");

        summary.executive_summary = Some("Exec".into());
        assert_eq!(summary.lead_text(), "Exec");
    }
}
