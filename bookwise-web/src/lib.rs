//! bookwise-web library
//!
//! Server-rendered catalog pages, a small JSON API, sitemap/robots and the
//! cookie-keyed session store. The database is opened read-only.

use anyhow::{Context, Result};
use axum::{middleware, Router};
use bookwise_common::ai::ChatService;
use bookwise_common::config::AppConfig;
use bookwise_common::images::ImageChecker;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod error;
pub mod pages;
pub mod session;

pub use crate::error::{ApiError, ApiResult, PageError, PageResult};

use crate::catalog::QueryCaches;
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only connection pool
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    /// Cover probing with per-URL memo
    pub images: Arc<ImageChecker>,
    pub chat: Arc<ChatService>,
    pub sessions: SessionStore,
    pub caches: Arc<QueryCaches>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Result<Self> {
        let images = ImageChecker::new(&config.images).context("Failed to build image checker")?;
        let chat = ChatService::new(&config.ai).context("Failed to build AI client")?;

        Ok(Self {
            db,
            sessions: SessionStore::new(Duration::from_secs(config.session_idle_secs)),
            caches: Arc::new(QueryCaches::new(Duration::from_secs(config.cache_ttl_secs))),
            images: Arc::new(images),
            chat: Arc::new(chat),
            config: Arc::new(config),
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let pages = pages::page_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        session::session_middleware,
    ));

    Router::new()
        .merge(pages)
        .merge(pages::seo_routes())
        .merge(api::api_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
