use chrono::{DateTime, Duration, Utc};

use super::errors::AuthError;

pub const DEFAULT_COOKIE_NAME: &str = "__Host-refresh_token";

/// Immutable token and cookie settings, built once at start-up
#[derive(Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub cookie_domain: String,
    pub cookie_path: String,
    pub cookie_name: String,
}

impl AuthConfig {
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            secret: secret.into(),
            access_ttl: Duration::minutes(15),
            refresh_ttl: Duration::hours(24),
            cookie_domain: String::new(),
            cookie_path: "/".to_string(),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn with_cookie(
        mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        self.cookie_name = name.into();
        self.cookie_path = path.into();
        self.cookie_domain = domain.into();
        self
    }

    /// HMAC key bytes; an empty secret is a configuration fault
    pub fn signing_key(&self) -> Result<&[u8], AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::Signing("signing secret is not configured".to_string()));
        }
        Ok(self.secret.as_bytes())
    }
}

/// `now + ttl`, or a `Signing` fault when the lifetime is not positive or leaves the clock range
pub fn expires_after(now: DateTime<Utc>, ttl: Duration) -> Result<DateTime<Utc>, AuthError> {
    if ttl <= Duration::zero() {
        return Err(AuthError::Signing(format!(
            "token lifetime must be positive, got {}s",
            ttl.num_seconds()
        )));
    }

    now.checked_add_signed(ttl)
        .ok_or_else(|| AuthError::Signing("token lifetime overflows the clock".to_string()))
}

// Keep the secret out of logs and panic messages
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}
