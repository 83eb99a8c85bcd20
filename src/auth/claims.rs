use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{config::expires_after, errors::AuthError};

/// Authenticated user as seen by the token layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// JWT payload shared by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    #[serde(rename = "iss")]
    pub issuer: String,
    #[serde(rename = "aud")]
    pub audience: String,
    #[serde(rename = "iat")]
    pub issued_at: i64, // Seconds since the Unix epoch
    #[serde(rename = "nbf")]
    pub not_before: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Claims {
    /// Builds claims for `identity` valid from `now` for `validity`
    pub fn for_identity(
        identity: &Identity,
        issuer: &str,
        audience: &str,
        now: DateTime<Utc>,
        validity: Duration,
    ) -> Result<Self, AuthError> {
        let issued_at = now.timestamp();
        let expires_at = expires_after(now, validity)?.timestamp();

        Ok(Self {
            subject: identity.id.to_string(),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            issued_at,
            not_before: issued_at,
            expires_at,
            name: Some(identity.full_name()),
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at
    }

    pub fn is_not_yet_valid(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.not_before
    }
}
