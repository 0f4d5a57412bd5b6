//! JWT access tokens.
//!
//! Tokens are signed with HS256 and carry the user's id, email, display name
//! and role so the client can render role-based views without an extra
//! profile fetch. There is no refresh or revocation mechanism; tokens simply
//! expire.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: String,
    /// User email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role (`customer`, `owner` or `admin`).
    pub role: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

/// Issues and verifies JWT access tokens.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec from the shared secret.
    #[must_use]
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Issue a token for the given user identity.
    pub fn issue(&self, id: &str, email: &str, name: &str, role: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Invalid signatures, malformed tokens and expired tokens all map to
    /// [`AppError::Unauthorized`].
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let codec = TokenCodec::new("test_secret", 1);
        let token = codec
            .issue("u1", "alex@example.com", "Foodie Alex", "customer")
            .unwrap();

        let claims = codec.verify(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "alex@example.com");
        assert_eq!(claims.role, "customer");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let codec = TokenCodec::new("secret_a", 1);
        let other = TokenCodec::new("secret_b", 1);

        let token = codec.issue("u1", "a@b.c", "A", "admin").unwrap();
        assert!(matches!(
            other.verify(&token),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let codec = TokenCodec::new("secret", 1);
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }
}
