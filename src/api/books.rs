//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    filter::{distinct_genres, filter_books},
    models::{book::BookRecord, filter::FilterState},
    services::catalog::DataSource,
};

/// Book listing with its provenance.
#[derive(Serialize, ToSchema)]
pub struct BooksResponse {
    pub books: Vec<BookRecord>,
    /// Fallback content is being shown in place of live data.
    pub degraded: bool,
    pub source: DataSource,
    pub refreshed_at: DateTime<Utc>,
}

/// List books, optionally narrowed by search term and genre
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(FilterState),
    responses(
        (status = 200, description = "List of books", body = BooksResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(filter): Query<FilterState>,
) -> AppResult<Json<BooksResponse>> {
    let outcome = state.services.books.records().await;
    let books = filter_books(&outcome.records, &filter);

    Ok(Json(BooksResponse {
        books,
        degraded: outcome.degraded(),
        source: outcome.source,
        refreshed_at: outcome.fetched_at,
    }))
}

/// Get one book by ISBN
#[utoipa::path(
    get,
    path = "/books/{isbn}",
    tag = "books",
    params(
        ("isbn" = String, Path, description = "Book ISBN")
    ),
    responses(
        (status = 200, description = "Book details", body = BookRecord),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(isbn): Path<String>,
) -> AppResult<Json<BookRecord>> {
    let outcome = state.services.books.records().await;
    outcome
        .records
        .iter()
        .find(|book| book.isbn == isbn)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))
}

#[derive(Serialize, ToSchema)]
pub struct GenresResponse {
    /// Distinct genres in first-seen order
    pub genres: Vec<String>,
}

/// Genres available for filtering
#[utoipa::path(
    get,
    path = "/genres",
    tag = "books",
    responses(
        (status = 200, description = "Distinct genres", body = GenresResponse)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
) -> AppResult<Json<GenresResponse>> {
    let outcome = state.services.books.records().await;
    Ok(Json(GenresResponse {
        genres: distinct_genres(&outcome.records),
    }))
}
