//! Review endpoints: listing plus the authenticated write path

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        book::ReviewRecord,
        review::{SubmitRating, SubmitReview},
    },
    services::refresh::FetchPhase,
};

use super::AuthenticatedUser;

#[derive(Serialize, ToSchema)]
pub struct ReviewsResponse {
    pub reviews: Vec<ReviewRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Current reviews for one book, straight from the store
#[utoipa::path(
    get,
    path = "/books/{isbn}/reviews",
    tag = "reviews",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Reviews for the book", body = ReviewsResponse)
    )
)]
pub async fn list_reviews(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<ReviewsResponse>> {
    let reviews = state.services.catalog.list_reviews(&isbn).await?;
    Ok(Json(ReviewsResponse { reviews }))
}

/// Submit a review for a book
#[utoipa::path(
    post,
    path = "/books/{isbn}/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = SubmitReview,
    responses(
        (status = 201, description = "Review saved", body = MessageResponse),
        (status = 400, description = "Invalid rating"),
        (status = 401, description = "Not signed in"),
        (status = 422, description = "Book record could not be created")
    )
)]
pub async fn submit_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Json(submission): Json<SubmitReview>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let user = claims.user_id();
    state
        .services
        .reviews
        .submit_review(&user, &isbn, submission)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Review submitted successfully!".to_string(),
        }),
    ))
}

/// Submit a star rating without a comment
#[utoipa::path(
    post,
    path = "/books/{isbn}/rating",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    request_body = SubmitRating,
    responses(
        (status = 200, description = "Rating saved", body = MessageResponse),
        (status = 400, description = "Invalid rating"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn submit_rating(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(isbn): Path<String>,
    Json(submission): Json<SubmitRating>,
) -> AppResult<Json<MessageResponse>> {
    let user = claims.user_id();
    let rating = submission.rating;
    state
        .services
        .reviews
        .submit_rating(&user, &isbn, submission)
        .await?;

    let title = match state.services.books.current() {
        FetchPhase::Ready(outcome) => outcome
            .records
            .iter()
            .find(|book| book.isbn == isbn)
            .map(|book| book.title.clone()),
        _ => None,
    }
    .unwrap_or_else(|| isbn.clone());

    Ok(Json(MessageResponse {
        message: format!("You rated {} {} stars.", title, rating),
    }))
}
