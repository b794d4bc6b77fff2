/// JWT issue and validation for Nexa services
///
/// Tokens are signed with HS256 using a shared secret loaded from configuration.
/// The `JwtManager` is created once at startup and handed to the HTTP layer
/// through application state; there is no global key storage.
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use crypto_core::jwt::JwtManager;
///
/// let manager = JwtManager::new("a-very-long-development-secret-value!", Duration::hours(24))
///     .expect("secret too short");
/// let token = manager.issue("65f1c0ffee0000000000beef", "marija", false).unwrap();
/// let data = manager.validate(&token).unwrap();
/// assert_eq!(data.claims.username, "marija");
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Default token lifetime when configuration does not override it
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Shortest accepted signing secret (bytes)
pub const MIN_SECRET_LEN: usize = 32;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure - standard claims plus Nexa-specific fields
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user ObjectId as hex string)
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Whether the user was an administrator at issue time
    pub is_admin: bool,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and validates bearer tokens with a single symmetric key.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    /// Build a manager from the shared secret.
    ///
    /// ## Errors
    ///
    /// Returns error if the secret is shorter than [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(anyhow!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            ));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    /// Token lifetime in seconds, as reported to clients
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Generate a signed token for a user.
    pub fn issue(&self, subject: &str, username: &str, is_admin: bool) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            username: username.to_string(),
            is_admin,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| anyhow!("Failed to generate token: {e}"))
    }

    /// Validate and decode a token (without the "Bearer " prefix).
    ///
    /// Verifies the HS256 signature and expiration. No other algorithm is
    /// accepted.
    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| anyhow!("Token validation failed: {e}"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "nexa-test-secret-0123456789-abcdefghij";

    fn manager() -> JwtManager {
        JwtManager::new(TEST_SECRET, Duration::hours(DEFAULT_TOKEN_TTL_HOURS)).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(JwtManager::new("short", Duration::hours(1)).is_err());
    }

    #[test]
    fn test_issue_and_validate() {
        let jwt = manager();
        let token = jwt.issue("65f1c0ffee0000000000beef", "marija", true).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let data = jwt.validate(&token).unwrap();
        assert_eq!(data.claims.sub, "65f1c0ffee0000000000beef");
        assert_eq!(data.claims.username, "marija");
        assert!(data.claims.is_admin);
        assert_eq!(data.claims.exp - data.claims.iat, jwt.ttl_secs());
    }

    #[test]
    fn test_validate_invalid_token() {
        assert!(manager().validate("invalid.token.here").is_err());
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = manager().issue("abc", "marija", false).unwrap();
        let other = JwtManager::new("another-secret-0123456789-abcdefghijkl", Duration::hours(1))
            .unwrap();
        assert!(other.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = JwtManager::new(TEST_SECRET, Duration::hours(-2)).unwrap();
        let token = jwt.issue("abc", "marija", false).unwrap();
        assert!(jwt.validate(&token).is_err());
    }
}
