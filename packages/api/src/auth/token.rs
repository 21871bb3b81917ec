//! # HS256 tokens carrying the caller's display name
//!
//! Tokens are JWTs signed with a shared secret ([`TokenKeys::new`]). The only
//! claim the memo service reads is `name`, which becomes the memo `writer`;
//! `exp` is required and checked on decode.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bearer::bearer_token;

/// Claims embedded in a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub name: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: u64,
}

/// The authenticated caller, as decoded from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
}

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token has no name claim")]
    MissingName,

    #[error("invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Signing and verification keys for bearer tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Sign a token for `name` that expires after `ttl`.
    pub fn issue(&self, name: &str, ttl: Duration) -> Result<String, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingName);
        }
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let claims = Claims {
            name: name.to_string(),
            exp: now.saturating_add(ttl.as_secs()),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify a token and return the identity it carries.
    pub fn decode(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        if data.claims.name.trim().is_empty() {
            return Err(AuthError::MissingName);
        }
        Ok(Identity {
            name: data.claims.name,
        })
    }

    /// Decode the bearer token of a request, if there is a valid one.
    pub fn identify(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = bearer_token(headers)?;
        match self.decode(token) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;
    use http::HeaderValue;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_issue_and_decode() {
        let keys = TokenKeys::new(b"test-secret");
        let token = keys.issue("Alice", HOUR).unwrap();
        assert_eq!(keys.decode(&token).unwrap(), Identity::new("Alice"));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = TokenKeys::new(b"one").issue("Alice", HOUR).unwrap();
        let result = TokenKeys::new(b"two").decode(&token);
        assert!(matches!(result, Err(AuthError::Jwt(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let keys = TokenKeys::new(b"test-secret");
        let claims = Claims {
            name: "Alice".to_string(),
            exp: 1_000,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert!(keys.decode(&token).is_err());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let keys = TokenKeys::new(b"test-secret");
        let token = keys.issue("Alice", Duration::from_secs(u64::MAX)).unwrap();
        assert_eq!(keys.decode(&token).unwrap(), Identity::new("Alice"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let keys = TokenKeys::new(b"test-secret");
        assert!(matches!(keys.issue("  ", HOUR), Err(AuthError::MissingName)));
    }

    #[test]
    fn test_identify_from_headers() {
        let keys = TokenKeys::new(b"test-secret");
        let token = keys.issue("Alice", HOUR).unwrap();

        let mut headers = HeaderMap::new();
        assert!(keys.identify(&headers).is_none());

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        assert_eq!(keys.identify(&headers), Some(Identity::new("Alice")));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer garbage"));
        assert!(keys.identify(&headers).is_none());
    }
}
