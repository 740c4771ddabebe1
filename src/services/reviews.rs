//! Review write path.
//!
//! Unlike the read paths, nothing here is fail-open: every failure surfaces
//! as a distinct, user-actionable error and nothing is retried automatically.

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::review::{NewReview, SubmitRating, SubmitReview},
    services::auth::UserId,
    store::Store,
};

pub struct ReviewService {
    store: Arc<dyn Store>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Submit a full review (rating + comment) for a book.
    ///
    /// The book row is created as a placeholder first when absent, so the
    /// review's foreign key is satisfiable. A placeholder failure aborts
    /// before the upsert.
    pub async fn submit_review(
        &self,
        user: &UserId,
        isbn: &str,
        submission: SubmitReview,
    ) -> AppResult<()> {
        submission
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.ensure_book_row(isbn).await?;

        let review = NewReview {
            book_isbn: isbn.to_string(),
            user_id: user.as_str().to_string(),
            rating: submission.rating,
            comment: submission.comment,
        };
        self.store
            .upsert_review(&review)
            .await
            .map_err(|e| AppError::ReviewWrite(e.to_string()))?;

        tracing::info!(isbn, user = user.as_str(), "review saved");
        Ok(())
    }

    /// Submit a star rating without a comment. An existing comment for the
    /// same `(book, user)` pair is left in place.
    pub async fn submit_rating(
        &self,
        user: &UserId,
        isbn: &str,
        submission: SubmitRating,
    ) -> AppResult<()> {
        submission
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.ensure_book_row(isbn).await?;

        let review = NewReview {
            book_isbn: isbn.to_string(),
            user_id: user.as_str().to_string(),
            rating: submission.rating,
            comment: None,
        };
        self.store
            .upsert_review(&review)
            .await
            .map_err(|e| AppError::ReviewWrite(e.to_string()))?;

        tracing::info!(isbn, user = user.as_str(), rating = submission.rating, "rating saved");
        Ok(())
    }

    async fn ensure_book_row(&self, isbn: &str) -> AppResult<()> {
        if self.store.book_exists(isbn).await? {
            return Ok(());
        }
        tracing::info!(isbn, "creating placeholder book row for review");
        self.store
            .insert_placeholder_book(isbn)
            .await
            .map_err(|e| AppError::BookCreation(e.to_string()))
    }
}
