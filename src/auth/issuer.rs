use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    claims::{Claims, Identity},
    config::{expires_after, AuthConfig},
    errors::AuthError,
};

/// Access/refresh token pair returned on login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints HS256-signed token pairs
pub struct TokenIssuer<'a> {
    config: &'a AuthConfig,
}

impl<'a> TokenIssuer<'a> {
    pub fn new(config: &'a AuthConfig) -> Self {
        Self { config }
    }

    /// Issues a fresh pair for `identity` using the current time
    pub fn issue(&self, identity: &Identity) -> Result<TokenPair, AuthError> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a pair as if the current time were `now`
    #[instrument(skip(self, identity), fields(user_id = identity.id))]
    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> Result<TokenPair, AuthError> {
        let key = EncodingKey::from_secret(self.config.signing_key()?);

        let access_claims = Claims::for_identity(
            identity,
            &self.config.issuer,
            &self.config.audience,
            now,
            self.config.access_ttl,
        )?;
        let refresh_claims = Claims {
            expires_at: expires_after(now, self.config.refresh_ttl)?.timestamp(),
            ..access_claims.clone()
        };

        let access_token = sign(&access_claims, &key)?;
        let refresh_token = sign(&refresh_claims, &key)?;

        debug!(
            access_exp = access_claims.expires_at,
            refresh_exp = refresh_claims.expires_at,
            "Issued token pair"
        );

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

/// Serializes and signs a single claims value
pub fn sign(claims: &Claims, key: &EncodingKey) -> Result<String, AuthError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(|e| {
        debug!(error = %e, "Failed to encode JWT token");
        AuthError::Signing(e.to_string())
    })
}
