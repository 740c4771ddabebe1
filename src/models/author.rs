//! Author view model and raw store rows

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Weak reference from an author to one of their books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub isbn: String,
    pub title: String,
}

/// Flat, display-ready author record produced by the aggregate mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthorRecord {
    pub id: i32,
    pub name: String,
    /// "No contact details" when the store holds none.
    pub contact_details: String,
    /// Association order, never null.
    pub books: Vec<BookRef>,
}

// --- Raw rows, shaped like the store projection ---

/// Embedded book sub-record on an author association. Fields are individually
/// optional so a half-deleted row still maps.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookSummary {
    pub isbn: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub genre: Option<String>,
}

/// Book association row; the embedded book may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookAssoc {
    pub book: Option<RawBookSummary>,
}

/// Author detail row with joined book associations.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthorRow {
    pub id: i32,
    pub name: String,
    pub contact_details: Option<String>,
    #[serde(default)]
    pub author_book: Vec<RawBookAssoc>,
}
