//! LLM-backed book chat, quizzes and audio summaries
//!
//! Talks to the Gemini `generateContent` REST endpoint. Every operation is a
//! single request with no retry; callers decide what to show on failure.

use crate::config::AiConfig;
use crate::db::models::{Book, Genre, Summary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Number of previous messages sent along with a question
pub const HISTORY_WINDOW: usize = 6;

pub const NOT_CONFIGURED_MESSAGE: &str = "⚠️ AI service not available. Please configure your \
    GEMINI_API_KEY in environment variables or the config file.";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => write!(f, "USER"),
            ChatRole::Assistant => write!(f, "ASSISTANT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Local wall-clock time, `HH:MM`
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Local::now().format("%H:%M").to_string(),
        }
    }
}

/// Book content handed to the model
#[derive(Debug, Clone, Default)]
pub struct BookContext {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Option<i64>,
    pub overview: String,
    pub executive_summary: Option<String>,
    pub main_content: String,
    pub takeaways: Vec<(String, String)>,
    pub analogies: Vec<(String, String, String)>,
    pub quotes: Vec<String>,
    pub action_steps: Vec<String>,
    pub who_should_read: Option<String>,
}

impl BookContext {
    pub fn new(book: &Book, genre: &Genre, summary: Option<&Summary>) -> Self {
        let mut context = BookContext {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: genre.name.clone(),
            year: book.publication_year,
            ..Default::default()
        };

        if let Some(summary) = summary {
            context.overview = summary.overview_text.clone();
            context.executive_summary = summary.executive_summary.clone();
            context.main_content = summary.main_content.clone();
            context.takeaways = summary
                .key_takeaways
                .iter()
                .map(|t| (t.title.clone(), t.text.clone()))
                .collect();
            context.analogies = summary
                .analogies
                .iter()
                .map(|a| (a.concept.clone(), a.analogy.clone(), a.explanation.clone()))
                .collect();
            context.quotes = summary.quotes.clone();
            context.action_steps = summary.action_steps.clone();
            context.who_should_read = summary.who_should_read.clone();
        }

        context
    }

    /// Executive summary, else overview
    pub fn fallback_summary(&self) -> String {
        match self.executive_summary.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => self.overview.clone(),
        }
    }
}

/// Render the prompt context block for a book
pub fn book_context(context: &BookContext) -> String {
    let mut parts = vec![
        format!("BOOK TITLE: {}", context.title),
        format!("AUTHOR: {}", context.author),
        format!("GENRE: {}", context.genre),
        format!(
            "PUBLICATION YEAR: {}",
            context
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "Unknown".to_string())
        ),
    ];

    if let Some(text) = context.executive_summary.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("\nEXECUTIVE SUMMARY:\n{}", text));
    }
    if !context.main_content.is_empty() {
        parts.push(format!("\nMAIN CONTENT:\n{}", context.main_content));
    }

    if !context.takeaways.is_empty() {
        parts.push("\nKEY TAKEAWAYS:".to_string());
        for (i, (title, text)) in context.takeaways.iter().enumerate() {
            if title.is_empty() {
                parts.push(format!("{}. {}", i + 1, text));
            } else {
                parts.push(format!("{}. {}: {}", i + 1, title, text));
            }
        }
    }

    if !context.analogies.is_empty() {
        parts.push("\nANALOGIES & MENTAL MODELS:".to_string());
        for (concept, analogy, explanation) in &context.analogies {
            parts.push(format!("- {}: {} - {}", concept, analogy, explanation));
        }
    }

    if !context.quotes.is_empty() {
        parts.push("\nNOTABLE QUOTES:".to_string());
        for quote in context.quotes.iter().take(5) {
            parts.push(format!("- \"{}\"", quote));
        }
    }

    if !context.action_steps.is_empty() {
        parts.push("\nACTION STEPS:".to_string());
        for (i, step) in context.action_steps.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, step));
        }
    }

    if let Some(text) = context.who_should_read.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("\nWHO SHOULD READ:\n{}", text));
    }

    parts.join("\n")
}

/// Build the full chat prompt
pub fn chat_prompt(message: &str, context: &BookContext, history: &[ChatMessage]) -> String {
    let mut history_text = String::new();
    if !history.is_empty() {
        history_text.push_str("\n\nPREVIOUS CONVERSATION:\n");
        let skip = history.len().saturating_sub(HISTORY_WINDOW);
        for msg in &history[skip..] {
            history_text.push_str(&format!("{}: {}\n", msg.role, msg.content));
        }
    }

    format!(
        "You are BookWise AI, an expert assistant specialized in discussing books and their insights.\n\n\
         You have complete knowledge of the following book:\n\n\
         {context}\n\n\
         INSTRUCTIONS:\n\
         1. Answer questions ONLY based on the book content provided above\n\
         2. Be helpful, insightful, and engaging\n\
         3. Use specific examples, quotes, and concepts from the book\n\
         4. If asked about something not in the book, politely say so\n\
         5. Relate concepts to practical, real-world applications\n\
         6. Keep responses concise but informative (2-3 paragraphs max)\n\
         7. Use markdown formatting for better readability\n\
         {history_text}\n\
         USER QUESTION: {message}\n\n\
         Provide a helpful, accurate response based on the book content:",
        context = book_context(context),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
}

/// Parse quiz JSON from model output, tolerating a fenced code block
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, AiError> {
    let mut body = text.trim();
    if body.starts_with("```") {
        body = body.split("```").nth(1).unwrap_or("");
        body = body.strip_prefix("json").unwrap_or(body);
    }
    serde_json::from_str(body.trim()).map_err(|e| AiError::ParseError(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Gemini client
pub struct ChatService {
    http_client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl ChatService {
    pub fn new(config: &AiConfig) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        if config.api_key.is_none() {
            info!("GEMINI_API_KEY not set, AI features disabled");
        }

        Ok(Self {
            http_client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the model's text
    pub async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AiError::NotConfigured);
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        debug!(model = %self.model, prompt_len = prompt.len(), "Calling generateContent");

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(status.as_u16(), error_text));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }

    /// Answer a question about a book; the reply is returned verbatim
    pub async fn chat_with_book(
        &self,
        message: &str,
        context: &BookContext,
        history: &[ChatMessage],
    ) -> Result<String, AiError> {
        if !self.is_configured() {
            return Err(AiError::NotConfigured);
        }
        self.generate(&chat_prompt(message, context, history)).await
    }

    /// Like [`chat_with_book`](Self::chat_with_book) but always yields display text
    pub async fn reply_or_fallback(
        &self,
        message: &str,
        context: &BookContext,
        history: &[ChatMessage],
    ) -> String {
        match self.chat_with_book(message, context, history).await {
            Ok(reply) => reply,
            Err(AiError::NotConfigured) => NOT_CONFIGURED_MESSAGE.to_string(),
            Err(e) => {
                warn!("Chat failed for {}: {}", context.title, e);
                format!("❌ Error generating response: {}", e)
            }
        }
    }

    /// Multiple-choice questions; empty on any failure
    pub async fn generate_quiz(&self, context: &BookContext, num_questions: usize) -> Vec<QuizQuestion> {
        if !self.is_configured() {
            return Vec::new();
        }

        let prompt = format!(
            "Based on this book summary, generate {num_questions} multiple choice questions to test understanding.\n\n\
             BOOK CONTENT:\n{context}\n\n\
             Generate questions in this JSON format:\n\
             [\n  {{\n    \"question\": \"Question text here\",\n    \
             \"options\": [\"A) Option 1\", \"B) Option 2\", \"C) Option 3\", \"D) Option 4\"],\n    \
             \"correct\": \"A\",\n    \"explanation\": \"Why this is correct\"\n  }}\n]\n\n\
             Return ONLY valid JSON, no other text:",
            context = book_context(context),
        );

        match self.generate(&prompt).await.and_then(|text| parse_quiz(&text)) {
            Ok(questions) => questions,
            Err(e) => {
                warn!("Quiz generation failed for {}: {}", context.title, e);
                Vec::new()
            }
        }
    }

    /// Listening-friendly summary, falling back to stored text
    pub async fn summarize_for_audio(&self, context: &BookContext) -> String {
        if !self.is_configured() {
            return context.fallback_summary();
        }

        let prompt = format!(
            "Create a 2-minute audio-friendly summary of this book.\n\
             The summary should:\n\
             - Be conversational and easy to listen to\n\
             - Cover the most important concepts\n\
             - Include 2-3 key takeaways\n\
             - End with a memorable insight\n\n\
             BOOK CONTENT:\n{}\n\n\
             Write the audio summary (about 300 words):",
            book_context(context)
        );

        match self.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Audio summary failed for {}: {}", context.title, e);
                context.fallback_summary()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> BookContext {
        BookContext {
            title: "Deep Work".into(),
            author: "Cal Newport".into(),
            genre: "Productivity".into(),
            year: Some(2016),
            overview: "Focus wins.".into(),
            main_content: "Distraction is costly.".into(),
            takeaways: vec![
                ("Focus".into(), "Protect deep time".into()),
                (String::new(), "Embrace boredom".into()),
            ],
            analogies: vec![("Attention".into(), "a muscle".into(), "it tires".into())],
            quotes: (1..=7).map(|i| format!("quote {}", i)).collect(),
            action_steps: vec!["Schedule blocks".into()],
            who_should_read: Some("Knowledge workers".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_book_context_sections() {
        let text = book_context(&context());
        assert!(text.starts_with("BOOK TITLE: Deep Work\nAUTHOR: Cal Newport"));
        assert!(text.contains("PUBLICATION YEAR: 2016"));
        assert!(text.contains("1. Focus: Protect deep time"));
        assert!(text.contains("2. Embrace boredom"));
        assert!(text.contains("- Attention: a muscle - it tires"));
        assert!(text.contains("- \"quote 5\""));
        assert!(!text.contains("quote 6"));
        assert!(text.contains("1. Schedule blocks"));
        assert!(text.contains("WHO SHOULD READ:\nKnowledge workers"));
        assert!(!text.contains("EXECUTIVE SUMMARY"));
    }

    #[test]
    fn test_unknown_year() {
        let ctx = BookContext {
            year: None,
            ..context()
        };
        assert!(book_context(&ctx).contains("PUBLICATION YEAR: Unknown"));
    }

    #[test]
    fn test_chat_prompt_keeps_last_six_messages() {
        let history: Vec<ChatMessage> = (0..8)
            .map(|i| {
                let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
                ChatMessage::new(role, format!("message-{}", i))
            })
            .collect();

        let prompt = chat_prompt("What is deep work?", &context(), &history);
        assert!(!prompt.contains("message-0"));
        assert!(!prompt.contains("message-1"));
        assert!(prompt.contains("USER: message-2"));
        assert!(prompt.contains("ASSISTANT: message-7"));
        assert!(prompt.contains("USER QUESTION: What is deep work?"));
        assert!(prompt.starts_with("You are BookWise AI"));
    }

    #[test]
    fn test_parse_quiz_plain_and_fenced() {
        let raw = r#"[{"question":"Q?","options":["A) x","B) y","C) z","D) w"],"correct":"A","explanation":"because"}]"#;
        assert_eq!(parse_quiz(raw).unwrap().len(), 1);

        let fenced = format!("```json\n{}\n```", raw);
        let parsed = parse_quiz(&fenced).unwrap();
        assert_eq!(parsed[0].correct, "A");
        assert_eq!(parsed[0].options.len(), 4);

        assert!(matches!(parse_quiz("not json"), Err(AiError::ParseError(_))));
    }

    #[test]
    fn test_fallback_summary() {
        let mut ctx = context();
        assert_eq!(ctx.fallback_summary(), "Focus wins.");
        ctx.executive_summary = Some("Exec".into());
        assert_eq!(ctx.fallback_summary(), "Exec");
    }

    #[test]
    fn test_timestamp_format() {
        let msg = ChatMessage::new(ChatRole::User, "hi");
        assert_eq!(msg.timestamp.len(), 5);
        assert_eq!(&msg.timestamp[2..3], ":");
    }
}
