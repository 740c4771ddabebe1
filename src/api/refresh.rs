//! Manual refresh endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Serialize, ToSchema)]
pub struct RefreshResponse {
    pub subject: String,
    /// Refetch token of the forced cycle
    pub token: u64,
}

/// Force a fresh fetch cycle for a subject ("books" or "authors")
#[utoipa::path(
    post,
    path = "/refresh/{subject}",
    tag = "refresh",
    params(
        ("subject" = String, Path, description = "Fetch subject: books or authors")
    ),
    responses(
        (status = 200, description = "Refresh triggered", body = RefreshResponse),
        (status = 400, description = "Unknown subject")
    )
)]
pub async fn refresh_subject(
    State(state): State<crate::AppState>,
    Path(subject): Path<String>,
) -> AppResult<Json<RefreshResponse>> {
    let token = match subject.as_str() {
        "books" => state.services.books.retry(),
        "authors" => state.services.authors.retry(),
        _ => {
            return Err(AppError::BadRequest(format!(
                "Unknown refresh subject: {}",
                subject
            )))
        }
    };

    Ok(Json(RefreshResponse { subject, token }))
}
