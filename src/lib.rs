//! BookWorm Catalog Service
//!
//! A Rust implementation of the BookWorm book-catalog backend: fetches books
//! and authors from a hosted Postgres store, normalizes nested query results
//! into flat view models, and recovers from transient failures or empty
//! results with a fixed fallback catalog and a client-visible refresh policy.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod mapper;
pub mod models;
pub mod notify;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
