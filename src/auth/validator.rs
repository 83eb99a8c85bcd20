use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument};

use super::{claims::Claims, config::AuthConfig, errors::AuthError};

/// Verifies tokens minted by [`TokenIssuer`](super::issuer::TokenIssuer)
pub struct TokenValidator<'a> {
    config: &'a AuthConfig,
}

impl<'a> TokenValidator<'a> {
    pub fn new(config: &'a AuthConfig) -> Self {
        Self { config }
    }

    /// Validates `token` against the current time
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validates `token` as if the current time were `now`
    ///
    /// Order of checks: structure, signature, not-before, expiry, issuer, audience.
    /// The first failing check decides the error.
    #[instrument(skip(self, token))]
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = self.verify_signature(token)?;

        if claims.is_not_yet_valid(now) {
            debug!(nbf = claims.not_before, "Token used before its not-before time");
            return Err(AuthError::NotYetValid);
        }
        if claims.is_expired(now) {
            debug!(exp = claims.expires_at, "Token has expired");
            return Err(AuthError::Expired);
        }
        if claims.issuer != self.config.issuer {
            debug!(issuer = %claims.issuer, "Token issuer mismatch");
            return Err(AuthError::InvalidIssuer);
        }
        if claims.audience != self.config.audience {
            debug!(audience = %claims.audience, "Token audience mismatch");
            return Err(AuthError::InvalidAudience);
        }

        debug!(subject = %claims.subject, exp = claims.expires_at, "Token validated");
        Ok(claims)
    }

    /// Checks structure and MAC only; time and issuer/audience checks are ours
    fn verify_signature(&self, token: &str) -> Result<Claims, AuthError> {
        // Nothing can verify against an unconfigured key
        let secret = self
            .config
            .signing_key()
            .map_err(|_| AuthError::InvalidSignature)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                map_decode_error(e.kind())
            })
    }
}

fn map_decode_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::ImmatureSignature => AuthError::NotYetValid,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        ErrorKind::InvalidAudience => AuthError::InvalidAudience,
        _ => AuthError::MalformedToken,
    }
}
