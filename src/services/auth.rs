//! Authentication: JWT claims validation for the write path.
//!
//! Read paths never require a user; only review/rating submissions are
//! gated, mirroring the hosted auth service's `getCurrentUser` contract.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Opaque user identifier from the auth token's subject claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Claims carried in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Subject: the user id.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl UserClaims {
    /// Validate a bearer token and extract its claims.
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<UserClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    pub fn user_id(&self) -> UserId {
        UserId(self.sub.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(sub: &str, exp: usize, secret: &str) -> String {
        encode(
            &Header::default(),
            &UserClaims {
                sub: sub.to_string(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn test_token_roundtrip() {
        let token = token("user-42", far_future(), "secret");
        let claims = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user-42");
        assert_eq!(claims.user_id().as_str(), "user-42");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = token("user-42", far_future(), "secret");
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = token("user-42", 1_000, "secret");
        assert!(UserClaims::from_token(&token, "secret").is_err());
    }
}
