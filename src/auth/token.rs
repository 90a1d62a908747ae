//! Signed, time-limited bearer tokens (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix stripped from presented tokens. Case-sensitive.
pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity.
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Why a token was refused. Callers outside this module see a single `Unauthorized`.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is missing")]
    Missing,
    #[error("token is malformed or badly signed: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
    #[error("token has expired")]
    Expired,
    #[error("token could not be signed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        TokenService {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, identity: &str) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    /// Token for `identity` expiring `ttl` after `now`.
    pub fn issue_at(&self, identity: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    pub fn verify(&self, presented: Option<&str>) -> Result<String, TokenError> {
        self.verify_at(presented, Utc::now())
    }

    /// Strip an optional `Bearer ` prefix, check the signature, then require `now < exp`.
    /// Returns the subject identity.
    pub fn verify_at(&self, presented: Option<&str>, now: DateTime<Utc>) -> Result<String, TokenError> {
        let raw = presented.ok_or(TokenError::Missing)?;
        let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(TokenError::Missing);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(data.claims.sub)
    }
}
