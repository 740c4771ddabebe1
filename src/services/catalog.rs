//! Catalog fetch orchestrator.
//!
//! Coordinates one fetch-and-map cycle against the store and classifies the
//! result. Read paths are fail-open: every control path ends in a returned
//! record set (live or fallback), never an error. This policy is only safe
//! because these paths are read-only; the write path in
//! [`crate::services::reviews`] propagates its errors instead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    fallback, mapper,
    models::{
        author::AuthorRecord,
        book::{BookRecord, ReviewRecord},
    },
    notify::Notifier,
    store::{Store, StoreError},
};

/// Where a fetch outcome's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Mapped rows from the live store.
    Live,
    /// Fallback catalog substituted for an empty live result.
    FallbackEmpty,
    /// Fallback catalog substituted after a transport failure.
    FallbackError,
}

/// Result of one fetch cycle.
#[derive(Debug, Clone)]
pub struct FetchOutcome<T> {
    pub records: Vec<T>,
    pub source: DataSource,
    pub fetched_at: DateTime<Utc>,
}

impl<T> FetchOutcome<T> {
    fn new(records: Vec<T>, source: DataSource) -> Self {
        Self {
            records,
            source,
            fetched_at: Utc::now(),
        }
    }

    /// Fallback content is being shown in place of live data.
    pub fn degraded(&self) -> bool {
        self.source != DataSource::Live
    }

    /// The live store yielded nothing this cycle, whatever is on display.
    pub fn live_empty(&self) -> bool {
        self.source == DataSource::FallbackEmpty || self.records.is_empty()
    }
}

pub struct CatalogService {
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Fetch and map all books. Never fails; see the module docs.
    pub async fn fetch_books(&self) -> FetchOutcome<BookRecord> {
        tracing::debug!("Fetching books from store");

        match self.try_fetch_books().await {
            Ok(Some(records)) => {
                tracing::debug!("Fetched {} books", records.len());
                FetchOutcome::new(records, DataSource::Live)
            }
            Ok(None) => {
                tracing::warn!("No books found in store, substituting sample data");
                FetchOutcome::new(fallback::sample_books(), DataSource::FallbackEmpty)
            }
            Err(e) => {
                tracing::error!("Failed to fetch books: {}", e);
                self.notifier.error("Failed to fetch books");
                FetchOutcome::new(self.enriched_sample_books().await, DataSource::FallbackError)
            }
        }
    }

    /// Fetch and map all authors. Never fails; see the module docs.
    pub async fn fetch_authors(&self) -> FetchOutcome<AuthorRecord> {
        tracing::debug!("Fetching authors from store");

        match self.try_fetch_authors().await {
            Ok(Some(records)) => {
                tracing::debug!("Fetched {} authors", records.len());
                FetchOutcome::new(records, DataSource::Live)
            }
            Ok(None) => {
                tracing::warn!("No authors found in store, substituting sample data");
                FetchOutcome::new(fallback::sample_authors(), DataSource::FallbackEmpty)
            }
            Err(e) => {
                tracing::error!("Failed to fetch authors: {}", e);
                self.notifier.error("Failed to fetch authors");
                FetchOutcome::new(fallback::sample_authors(), DataSource::FallbackError)
            }
        }
    }

    /// Live reviews for one book. Not fail-open: this backs the post-submit
    /// refresh, where masking a failure would hide the user's own review.
    pub async fn list_reviews(&self, isbn: &str) -> AppResult<Vec<ReviewRecord>> {
        let rows = self.store.fetch_reviews(isbn).await?;
        Ok(rows.into_iter().map(mapper::map_review).collect())
    }

    async fn try_fetch_books(&self) -> Result<Option<Vec<BookRecord>>, StoreError> {
        let count = self.store.probe("book").await?;
        tracing::debug!("Book table probe: {} records", count);

        let rows = self.store.fetch_book_rows().await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(mapper::map_book).collect()))
    }

    async fn try_fetch_authors(&self) -> Result<Option<Vec<AuthorRecord>>, StoreError> {
        let count = self.store.probe("author").await?;
        tracing::debug!("Author table probe: {} records", count);

        let rows = self.store.fetch_author_rows().await?;
        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows.into_iter().map(mapper::map_author).collect()))
    }

    /// Best-effort: attribute synthetic reviews to real customer ids when the
    /// customer probe succeeds. Its own failures are swallowed.
    async fn enriched_sample_books(&self) -> Vec<BookRecord> {
        match self.store.customer_ids().await {
            Ok(ids) if !ids.is_empty() => {
                fallback::sample_books_with_synthetic_reviews(&ids, &mut rand::thread_rng())
            }
            Ok(_) => fallback::sample_books(),
            Err(e) => {
                tracing::debug!("Customer id probe failed, using plain samples: {}", e);
                fallback::sample_books()
            }
        }
    }
}
