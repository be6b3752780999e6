use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;

/// Lifetime of every issued token. There is no refresh; clients log in again.
pub const TOKEN_TTL: Duration = Duration::days(7);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("JWT signing secret is not configured")]
    MissingSecret,
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Signing and verification keys derived from the process-wide secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    fn issue_at(&self, user_id: Uuid, now: OffsetDateTime) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            iat: now.unix_timestamp(),
            exp: (now + self.ttl).unix_timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(TokenError::Sign)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Returns the user the token was issued for. Expiry is checked with no leeway.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(TokenError::Invalid)?;
        debug!(user_id = %data.claims.user_id, "jwt verified");
        Ok(data.claims.user_id)
    }
}
