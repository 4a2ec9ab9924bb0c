//! Authentication user types.

use crate::api::ApiError;
use crate::jwt::Claims;

/// Authenticated user information extracted from the session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// JWT claims from the session token
    pub claims: Claims,
}

impl AuthenticatedUser {
    pub fn email(&self) -> &str {
        &self.claims.email
    }

    /// Require that the caller is the owner of `email`.
    /// The comparison is exact, including case.
    pub fn require_owner(&self, email: &str) -> Result<(), ApiError> {
        if self.claims.email == email {
            Ok(())
        } else {
            tracing::warn!(
                identity = %self.claims.email,
                requested = %email,
                "Ownership check failed"
            );
            Err(ApiError::forbidden("forbidden access"))
        }
    }
}
