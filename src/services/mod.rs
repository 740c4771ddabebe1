//! Business logic services

pub mod auth;
pub mod catalog;
pub mod refresh;
pub mod reviews;

use std::sync::Arc;

use crate::{
    config::FetchConfig,
    models::{author::AuthorRecord, book::BookRecord},
    notify::Notifier,
    store::Store,
};

use catalog::CatalogService;
use refresh::{RefreshController, RefreshPolicy};
use reviews::ReviewService;

/// Container for all services
pub struct Services {
    pub catalog: Arc<CatalogService>,
    pub reviews: ReviewService,
    pub books: RefreshController<BookRecord>,
    pub authors: RefreshController<AuthorRecord>,
}

impl Services {
    /// Create all services over the given store and notification sink.
    ///
    /// Books and authors get independent refresh controllers: separate
    /// tokens, caches and watchdogs.
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>, fetch: &FetchConfig) -> Self {
        let catalog = Arc::new(CatalogService::new(store.clone(), notifier.clone()));
        let policy = RefreshPolicy::from(fetch);
        Self {
            books: RefreshController::new("books", catalog.clone(), notifier.clone(), policy),
            authors: RefreshController::new("authors", catalog.clone(), notifier, policy),
            reviews: ReviewService::new(store),
            catalog,
        }
    }
}
