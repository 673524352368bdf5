//! JWT token generation and validation.
//!
//! Tokens are signed with HS256 and carry the user id as the subject claim.
//! Access tokens are short-lived (24 hours); refresh tokens last 30 days and
//! can only be exchanged for new access tokens.
//!
//! # Example
//!
//! ```
//! use quillcast_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
//! use uuid::Uuid;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = "a-secret-key-that-is-at-least-32-bytes";
//! let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
//! let token = create_token(&claims, secret)?;
//!
//! let validated = validate_access_token(&token, secret)?;
//! assert_eq!(validated.sub, claims.sub);
//! # Ok(())
//! # }
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ISSUER: &str = "quillcast";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token is of the wrong type for this operation
    #[error("Expected a {expected} token")]
    WrongTokenType { expected: &'static str },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (24 hours)
    Access,

    /// Refresh token (30 days)
    Refresh,
}

impl TokenType {
    /// Default expiration duration for this token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }
}

/// JWT claims: standard subject/issuer/expiry plus the token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: Uuid,

    /// Issuer - always "quillcast"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token type
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims for `user_id` with the default expiration for the
    /// token type.
    pub fn new(user_id: Uuid, token_type: TokenType) -> Self {
        let now = Utc::now();
        let expires = now + token_type.default_expiration();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            token_type,
        }
    }
}

/// Signs `claims` into a compact JWT string.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Decodes and validates a token's signature, expiry, and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(e.to_string()),
    })?;

    Ok(data.claims)
}

/// Validates a token and additionally requires it to be an access token.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;
    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType { expected: "access" });
    }
    Ok(claims)
}

/// Exchanges a valid refresh token for a new access token.
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let claims = validate_token(refresh_token, secret)?;
    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongTokenType { expected: "refresh" });
    }

    let access_claims = Claims::new(claims.sub, TokenType::Access);
    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn create_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_access_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "quillcast");
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-32-bytes-long!!");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn refresh_token_cannot_be_used_as_access_token() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Refresh);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_access_token(&token, SECRET);
        assert!(matches!(
            result,
            Err(JwtError::WrongTokenType { expected: "access" })
        ));
    }

    #[test]
    fn refresh_flow_issues_new_access_token() {
        let user_id = Uuid::new_v4();
        let refresh_claims = Claims::new(user_id, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        let access_token = refresh_access_token(&refresh_token, SECRET).unwrap();
        let validated = validate_access_token(&access_token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
    }

    #[test]
    fn access_token_cannot_refresh() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let result = refresh_access_token(&token, SECRET);
        assert!(matches!(
            result,
            Err(JwtError::WrongTokenType { expected: "refresh" })
        ));
    }

    #[test]
    fn expiration_is_ordered() {
        let claims = Claims::new(Uuid::new_v4(), TokenType::Access);
        assert!(claims.exp > claims.iat);
    }
}
