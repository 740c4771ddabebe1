//! API handlers for BookWorm REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;
pub mod refresh;
pub mod reviews;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{error::AppError, services::auth::UserClaims, AppState};

/// Extractor for the authenticated user from a JWT bearer token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Authentication("Please sign in to leave a review".to_string())
                })?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|_| AppError::Authentication("Please sign in to leave a review".to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}
