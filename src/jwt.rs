//! Session token issuing and verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Default session duration: 1 hour
pub const DEFAULT_TOKEN_DURATION_SECS: u64 = 60 * 60;

/// JWT claims carried by the session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the signed-in user
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    duration: u64,
}

/// Result of issuing a session token.
#[derive(Debug, Clone)]
pub struct TokenResult {
    /// The JWT token string
    pub token: String,
    /// Token duration in seconds
    pub duration: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret and token lifetime.
    pub fn new(secret: &[u8], duration: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            duration,
        }
    }

    /// Token lifetime in seconds.
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Issue a token for the given identity.
    pub fn issue(&self, email: &str) -> Result<TokenResult, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let claims = Claims {
            email: email.to_string(),
            iat: now,
            exp: now + self.duration,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(TokenResult {
            token,
            duration: self.duration,
        })
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Malformed(e),
            })
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Token is past its expiry
    Expired,
    /// Token was signed with a different secret
    InvalidSignature,
    /// Token could not be decoded
    Malformed(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Expired => write!(f, "Token has expired"),
            JwtError::InvalidSignature => write!(f, "Token signature is invalid"),
            JwtError::Malformed(e) => write!(f, "Malformed token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
        }
    }
}

impl std::error::Error for JwtError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", DEFAULT_TOKEN_DURATION_SECS);

        let result = config.issue("alice@example.com").unwrap();
        assert_eq!(result.duration, DEFAULT_TOKEN_DURATION_SECS);

        let claims = config.verify(&result.token).unwrap();
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_DURATION_SECS);
    }

    #[test]
    fn test_custom_duration() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", 120);

        let result = config.issue("alice@example.com").unwrap();
        let claims = config.verify(&result.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 120);
    }

    #[test]
    fn test_malformed_token() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", 60);

        let result = config.verify("invalid-token");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = JwtConfig::new(b"secret-1", 60);
        let config2 = JwtConfig::new(b"secret-2", 60);

        let result = config1.issue("alice@example.com").unwrap();

        let validation = config2.verify(&result.token);
        assert!(matches!(validation, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let secret = b"test-secret";
        let encoding_key = EncodingKey::from_secret(secret);

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Expired 50 seconds ago
        let claims = Claims {
            email: "alice@example.com".to_string(),
            iat: now - 100,
            exp: now - 50,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key).unwrap();

        let config = JwtConfig::new(secret, 60);
        assert!(matches!(config.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_same_claims_same_token() {
        let config = JwtConfig::new(b"test-secret-key-for-testing", 60);
        let encoding_key = EncodingKey::from_secret(b"test-secret-key-for-testing");

        let claims = Claims {
            email: "alice@example.com".to_string(),
            iat: 1_000,
            exp: 4_102_444_800,
        };

        let a = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key).unwrap();
        let b = jsonwebtoken::encode(&Header::default(), &claims, &encoding_key).unwrap();
        assert_eq!(a, b);
        assert_eq!(config.verify(&a).unwrap().email, "alice@example.com");
    }
}
