//! Author catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::author::AuthorRecord,
    services::catalog::DataSource,
};

/// Author listing with its provenance.
#[derive(Serialize, ToSchema)]
pub struct AuthorsResponse {
    pub authors: Vec<AuthorRecord>,
    /// Fallback content is being shown in place of live data.
    pub degraded: bool,
    pub source: DataSource,
    pub refreshed_at: DateTime<Utc>,
}

/// List all authors with their books
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = AuthorsResponse)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
) -> AppResult<Json<AuthorsResponse>> {
    let outcome = state.services.authors.records().await;

    Ok(Json(AuthorsResponse {
        authors: outcome.records.clone(),
        degraded: outcome.degraded(),
        source: outcome.source,
        refreshed_at: outcome.fetched_at,
    }))
}

/// Get one author by id
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author id")
    ),
    responses(
        (status = 200, description = "Author details", body = AuthorRecord),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorRecord>> {
    let outcome = state.services.authors.records().await;
    outcome
        .records
        .iter()
        .find(|author| author.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
}
