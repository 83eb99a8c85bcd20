//! Refresh-token cookie construction.
//!
//! Logout only overwrites the client's copy. A refresh token captured before
//! logout keeps validating until its own `exp`, since nothing is stored server-side.

use axum::http::{header::InvalidHeaderValue, HeaderValue};
use chrono::{DateTime, TimeZone, Utc};
use httpdate::fmt_http_date;
use std::fmt;
use std::time::SystemTime;

use super::{
    config::{expires_after, AuthConfig},
    errors::AuthError,
};

/// Outbound refresh cookie, always `HttpOnly; Secure; SameSite=Strict`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub domain: String,
    /// Seconds; zero or negative asks the client to delete the cookie now
    pub max_age: i64,
    pub expires: DateTime<Utc>,
}

impl RefreshCookie {
    pub fn is_cleared(&self) -> bool {
        self.value.is_empty() && self.max_age <= 0
    }

    /// `Set-Cookie` header value
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.to_string())
    }
}

impl fmt::Display for RefreshCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;

        if !self.domain.is_empty() {
            write!(f, "; Domain={}", self.domain)?;
        }

        // Max-Age=0 is the wire form of "delete now"
        write!(f, "; Max-Age={}", self.max_age.max(0))?;
        write!(
            f,
            "; Expires={}",
            fmt_http_date(SystemTime::from(self.expires))
        )?;

        write!(f, "; HttpOnly; Secure; SameSite=Strict")
    }
}

/// Builds refresh and cleared cookies from the configured attributes
pub struct CookieManager<'a> {
    config: &'a AuthConfig,
}

impl<'a> CookieManager<'a> {
    pub fn new(config: &'a AuthConfig) -> Self {
        Self { config }
    }

    pub fn refresh_cookie(&self, token: &str) -> Result<RefreshCookie, AuthError> {
        self.refresh_cookie_at(token, Utc::now())
    }

    pub fn refresh_cookie_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshCookie, AuthError> {
        let expires = expires_after(now, self.config.refresh_ttl)?;

        Ok(self.cookie(
            token.to_string(),
            self.config.refresh_ttl.num_seconds(),
            expires,
        ))
    }

    /// Empty, already-expired cookie that makes the client drop its refresh token
    pub fn expired_cookie(&self) -> RefreshCookie {
        self.cookie(String::new(), -1, unix_epoch())
    }

    fn cookie(&self, value: String, max_age: i64, expires: DateTime<Utc>) -> RefreshCookie {
        RefreshCookie {
            name: self.config.cookie_name.clone(),
            value,
            path: self.config.cookie_path.clone(),
            domain: self.config.cookie_domain.clone(),
            max_age,
            expires,
        }
    }
}

fn unix_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}
