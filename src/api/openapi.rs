//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::api::{authors, books, health, refresh, reviews};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookWorm API",
        version = "0.3.0",
        description = "Book catalog REST API with fail-open reads and fallback data",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html"),
        contact(name = "BookWorm Team")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::list_genres,
        // Authors
        authors::list_authors,
        authors::get_author,
        // Reviews
        reviews::list_reviews,
        reviews::submit_review,
        reviews::submit_rating,
        // Refresh
        refresh::refresh_subject,
    ),
    components(
        schemas(
            // Books
            crate::models::book::BookRecord,
            crate::models::book::ReviewRecord,
            crate::models::book::AuthorSummary,
            books::BooksResponse,
            books::GenresResponse,
            // Authors
            crate::models::author::AuthorRecord,
            crate::models::author::BookRef,
            authors::AuthorsResponse,
            // Reviews
            crate::models::review::SubmitReview,
            crate::models::review::SubmitRating,
            reviews::ReviewsResponse,
            reviews::MessageResponse,
            // Refresh
            crate::services::catalog::DataSource,
            refresh::RefreshResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "authors", description = "Author catalog"),
        (name = "reviews", description = "Review listing and submission"),
        (name = "refresh", description = "Manual refresh triggers")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
