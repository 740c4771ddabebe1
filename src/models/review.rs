//! Review submission requests and write-path rows

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Full review submission: star rating plus free-text comment.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitReview {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// Rating-only submission from the quick-rate flow.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitRating {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
}

/// Review row written to the store, keyed by `(book_isbn, user_id)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReview {
    pub book_isbn: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: Option<String>,
}
