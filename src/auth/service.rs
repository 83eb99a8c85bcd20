use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    claims::{Claims, Identity},
    config::AuthConfig,
    cookie::{CookieManager, RefreshCookie},
    errors::AuthError,
    issuer::{TokenIssuer, TokenPair},
    validator::TokenValidator,
};
use crate::{shared::AppError, user::UserRepository};

/// Token pair plus the cookie carrying its refresh half
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub tokens: TokenPair,
    pub cookie: RefreshCookie,
}

/// Login, refresh and logout over the user store and the token layer
pub struct AuthService {
    config: Arc<AuthConfig>,
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(config: Arc<AuthConfig>, users: Arc<dyn UserRepository>) -> Self {
        Self { config, users }
    }

    /// Checks credentials and issues a new session
    ///
    /// Unknown email and wrong password fail identically.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AppError> {
        let user = match self.users.get_by_email(email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AuthError::Credential.into());
            }
        };

        if !self.users.password_matches(&user, password).await {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(AuthError::Credential.into());
        }

        let session = self.issue_session(&user.identity())?;
        info!(user_id = user.id, "User authenticated");
        Ok(session)
    }

    /// Exchanges a still-valid refresh token for a rotated session
    ///
    /// The presented token is not invalidated; it stays usable until it expires.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<IssuedSession, AppError> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;

        let claims = TokenValidator::new(&self.config)
            .validate(token)
            .map_err(|e| {
                warn!(error = %e, "Refresh token rejected");
                e
            })?;

        let user_id: i64 = claims.subject.parse().map_err(|_| {
            warn!(subject = %claims.subject, "Refresh token subject is not a user id");
            AuthError::UnknownUser
        })?;

        let user = self.users.get_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id, "Refresh token subject no longer exists");
            AuthError::UnknownUser
        })?;

        let session = self.issue_session(&user.identity())?;
        info!(user_id, "Token pair rotated");
        Ok(session)
    }

    /// Cookie that clears the client's refresh token
    #[instrument(skip(self))]
    pub fn logout(&self) -> RefreshCookie {
        info!("Clearing refresh cookie");
        CookieManager::new(&self.config).expired_cookie()
    }

    /// Validates a bearer token presented on a protected route
    #[instrument(skip(self, token))]
    pub fn authorize(&self, token: &str) -> Result<Claims, AuthError> {
        TokenValidator::new(&self.config).validate(token)
    }

    fn issue_session(&self, identity: &Identity) -> Result<IssuedSession, AuthError> {
        let tokens = TokenIssuer::new(&self.config).issue(identity)?;
        let cookie = CookieManager::new(&self.config).refresh_cookie(&tokens.refresh_token)?;

        Ok(IssuedSession { tokens, cookie })
    }
}
