//! Store access layer
//!
//! The hosted relational store is consumed through the [`Store`] trait so the
//! fetch orchestrator and the write path can be exercised against fakes. The
//! production implementation is [`postgres::PgStore`].

pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    author::RawAuthorRow,
    book::{RawBookRow, RawReviewRow},
    review::NewReview,
};

pub use postgres::PgStore;

/// Errors surfaced by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Query interface against the hosted store.
///
/// Read methods return raw nested rows; mapping to view models is the
/// aggregate mapper's job. Write methods are used by the review write path
/// only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Lightweight existence/count probe for a table.
    async fn probe(&self, table: &str) -> Result<i64, StoreError>;

    /// Full book detail rows with joined author associations and reviews.
    async fn fetch_book_rows(&self) -> Result<Vec<RawBookRow>, StoreError>;

    /// Full author detail rows with joined book associations.
    async fn fetch_author_rows(&self) -> Result<Vec<RawAuthorRow>, StoreError>;

    /// Review rows for a single book, in store return order.
    async fn fetch_reviews(&self, isbn: &str) -> Result<Vec<RawReviewRow>, StoreError>;

    /// Whether a book row with this ISBN exists.
    async fn book_exists(&self, isbn: &str) -> Result<bool, StoreError>;

    /// Insert a minimal book row so review foreign keys are satisfiable.
    async fn insert_placeholder_book(&self, isbn: &str) -> Result<(), StoreError>;

    /// Upsert a review keyed by `(book_isbn, user_id)`.
    async fn upsert_review(&self, review: &NewReview) -> Result<(), StoreError>;

    /// Identifiers of known customers, used to attribute synthetic reviews.
    async fn customer_ids(&self) -> Result<Vec<String>, StoreError>;
}
