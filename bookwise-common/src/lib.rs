//! # BookWise Common Library
//!
//! Shared code for the BookWise catalog server and maintenance CLI:
//! - Database schema, models and queries
//! - Recommendation scoring, pagination and browse filters
//! - Image reachability, AI chat and text-to-speech integrations
//! - Sitemap generation, reading lists and per-user session state
//! - Configuration loading

pub mod ai;
pub mod cache;
pub mod config;
pub mod db;
pub mod discovery;
pub mod error;
pub mod filters;
pub mod images;
pub mod pagination;
pub mod reading_lists;
pub mod recommend;
pub mod session;
pub mod sitemap;
pub mod text_utils;
pub mod tts;

pub use error::{Error, Result};
