//! Book view model and raw store rows

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One review attached to a book.
///
/// `rating` stays optional: rows without a rating are kept for display but
/// excluded from the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewRecord {
    pub rating: Option<i32>,
    pub user_id: String,
    pub comment: String,
}

/// Read-only projection of the first resolved author on a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorSummary {
    pub id: i32,
    pub name: String,
    pub contact_details: Option<String>,
}

/// Flat, display-ready book record produced by the aggregate mapper.
///
/// Every field is populated; absent source data is replaced by the documented
/// defaults, so consumers never need their own null handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookRecord {
    /// Stable key within one fetch result. Duplicates pass through untouched.
    pub isbn: String,
    pub title: String,
    /// Comma-joined resolved author names, or "Unknown Author".
    pub author_display: String,
    /// Mean of rated reviews rounded to one decimal, else the stored rating,
    /// else 0.0. Always within [0, 5].
    pub rating_aggregate: f64,
    pub genre: String,
    pub image_url: String,
    pub summary: String,
    pub author_details: Option<AuthorSummary>,
    /// Store return order, never null.
    pub reviews: Vec<ReviewRecord>,
}

// --- Raw rows, shaped like the store projection ---

/// Review row as returned by the store join (`books_read`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawReviewRow {
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub user_id: String,
}

/// Author association row; the embedded author may be null when the
/// referenced row is gone.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthorAssoc {
    pub author: Option<AuthorSummary>,
}

/// Book detail row with joined author associations and reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookRow {
    pub isbn: String,
    pub name: String,
    pub summary: Option<String>,
    pub rating: Option<f64>,
    pub genre: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub author_book: Vec<RawAuthorAssoc>,
    #[serde(default)]
    pub books_read: Vec<RawReviewRow>,
}
