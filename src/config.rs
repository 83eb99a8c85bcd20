use chrono::Duration;
use clap::Parser;

use crate::auth::{AuthConfig, AuthError, DEFAULT_COOKIE_NAME};

/// One day
pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;
/// One year
pub const MAX_REFRESH_TTL_HOURS: i64 = 365 * 24;

/// Process configuration, read once at start-up
#[derive(Debug, Clone, Parser)]
#[command(name = "movies-api", about = "Movie catalogue API with JWT sessions")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Postgres connection string; the in-memory user store is used when absent
    #[arg(long, env = "DATABASE_URL")]
    pub dsn: Option<String>,

    /// HMAC signing secret
    #[arg(long, env = "JWT_SECRET", default_value = "verysecret", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "JWT_ISSUER", default_value = "example.com")]
    pub jwt_issuer: String,

    #[arg(long, env = "JWT_AUDIENCE", default_value = "example.com")]
    pub jwt_audience: String,

    /// Left empty by default: browsers drop `__Host-` cookies that carry a Domain
    #[arg(long, env = "COOKIE_DOMAIN", default_value = "")]
    pub cookie_domain: String,

    #[arg(long, env = "COOKIE_NAME", default_value = DEFAULT_COOKIE_NAME)]
    pub cookie_name: String,

    #[arg(long, env = "COOKIE_PATH", default_value = "/")]
    pub cookie_path: String,

    #[arg(
        long,
        env = "ACCESS_TTL_MINUTES",
        default_value_t = 15,
        value_parser = clap::value_parser!(i64).range(1..=MAX_ACCESS_TTL_MINUTES)
    )]
    pub access_ttl_minutes: i64,

    #[arg(
        long,
        env = "REFRESH_TTL_HOURS",
        default_value_t = 24,
        value_parser = clap::value_parser!(i64).range(1..=MAX_REFRESH_TTL_HOURS)
    )]
    pub refresh_ttl_hours: i64,
}

impl Config {
    pub fn auth_config(&self) -> Result<AuthConfig, AuthError> {
        let access_ttl = Duration::try_minutes(self.access_ttl_minutes)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| ttl_error("access", self.access_ttl_minutes, "minutes"))?;
        let refresh_ttl = Duration::try_hours(self.refresh_ttl_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| ttl_error("refresh", self.refresh_ttl_hours, "hours"))?;

        Ok(
            AuthConfig::new(&self.jwt_issuer, &self.jwt_audience, &self.jwt_secret)
                .with_ttls(access_ttl, refresh_ttl)
                .with_cookie(&self.cookie_name, &self.cookie_path, &self.cookie_domain),
        )
    }
}

fn ttl_error(kind: &str, value: i64, unit: &str) -> AuthError {
    AuthError::Signing(format!("{} token lifetime of {} {} is not usable", kind, value, unit))
}
