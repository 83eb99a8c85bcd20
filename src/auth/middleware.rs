use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{info, instrument, warn};

use super::{errors::AuthError, service::AuthService};
use crate::shared::{AppError, AppState};

/// Bearer authentication middleware - validates the Authorization header and adds Claims to the request.
/// Usage: .layer(middleware::from_fn_with_state(app_state.clone(), auth::require_auth))
/// Handlers can then extract Extension(claims): Extension<Claims>.
///
/// Any validly signed token is accepted here, refresh tokens included.
#[instrument(skip(state, req, next))]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AuthError::MissingToken
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AuthError::MalformedToken
    })?;

    let service = AuthService::new(state.auth_config.clone(), state.user_repository.clone());
    let claims = service.authorize(token).map_err(|e| {
        warn!(error = %e, uri = %req.uri(), "Bearer authentication failed");
        e
    })?;

    info!(subject = %claims.subject, "Authentication successful, adding claims to request");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
