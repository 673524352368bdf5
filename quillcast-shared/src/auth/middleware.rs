//! Per-request authentication context.
//!
//! The API server's JWT middleware validates the Bearer token and inserts an
//! [`AuthContext`] into request extensions; protected handlers pull it back
//! out with Axum's `Extension` extractor.
//!
//! ```no_run
//! use axum::Extension;
//! use quillcast_shared::auth::middleware::AuthContext;
//!
//! async fn handler(Extension(auth): Extension<AuthContext>) -> String {
//!     format!("caller: {}", auth.user_id)
//! }
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;

/// Authentication context added to request extensions after a token has been
/// validated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims.
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenType;

    #[test]
    fn context_carries_the_subject() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, TokenType::Access);
        let ctx = AuthContext::from_claims(&claims);
        assert_eq!(ctx.user_id, user_id);
    }
}
