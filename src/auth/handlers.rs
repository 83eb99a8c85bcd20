use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::{
    claims::Claims,
    cookie::RefreshCookie,
    service::{AuthService, IssuedSession},
};
use crate::shared::{AppError, AppState};

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct WhoAmIResponse {
    pub subject: String,
    pub name: Option<String>,
    pub expires_at: i64,
}

fn service(state: &AppState) -> AuthService {
    AuthService::new(state.auth_config.clone(), state.user_repository.clone())
}

fn set_cookie_header(cookie: &RefreshCookie) -> Result<HeaderValue, AppError> {
    cookie
        .to_header_value()
        .map_err(|e| AppError::Internal(format!("invalid Set-Cookie header: {}", e)))
}

fn session_response(status: StatusCode, session: IssuedSession) -> Result<Response, AppError> {
    let cookie = set_cookie_header(&session.cookie)?;
    Ok((status, [(header::SET_COOKIE, cookie)], Json(session.tokens)).into_response())
}

/// Reads a single cookie value from the request's `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// HTTP handler for logging in
///
/// POST /authenticate
/// Returns the token pair in the body and the refresh token as a cookie
#[instrument(name = "authenticate", skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected login payload");
        AppError::BadRequest(e.body_text())
    })?;

    let session = service(&state)
        .login(&request.email, &request.password)
        .await?;

    session_response(StatusCode::ACCEPTED, session)
}

/// HTTP handler for rotating the token pair
///
/// GET /refresh
/// Reads the refresh cookie and answers like /authenticate
#[instrument(name = "refresh_token", skip(state, headers))]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let token = cookie_value(&headers, &state.auth_config.cookie_name);
    let session = service(&state).refresh(token.as_deref()).await?;

    session_response(StatusCode::OK, session)
}

/// HTTP handler for logging out
///
/// GET /logout
/// Only clears the client cookie; issued tokens stay valid until they expire
#[instrument(name = "logout", skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    let cookie = set_cookie_header(&service(&state).logout())?;
    Ok((StatusCode::ACCEPTED, [(header::SET_COOKIE, cookie)]).into_response())
}

/// GET /admin/whoami
#[instrument(name = "whoami", skip(claims))]
pub async fn whoami(Extension(claims): Extension<Claims>) -> Json<WhoAmIResponse> {
    info!(subject = %claims.subject, "Serving identity for authenticated caller");

    Json(WhoAmIResponse {
        subject: claims.subject,
        name: claims.name,
        expires_at: claims.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issuer::TokenPair;
    use crate::shared::test_utils::{test_user, AppStateBuilder, TEST_PASSWORD};
    use axum::{
        body::Body,
        http::Request,
        routing::{get, post},
        Router,
    };
    use tower::ServiceExt; // for `oneshot`

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/authenticate", post(authenticate))
            .route("/refresh", get(refresh_token))
            .route("/logout", get(logout))
            .with_state(state)
    }

    fn login_request(email: &str, password: &str) -> Request<Body> {
        let body = serde_json::to_vec(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .unwrap();

        Request::builder()
            .method("POST")
            .uri("/authenticate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; __Host-refresh_token=a.b.c; lang=en"),
        );

        assert_eq!(
            cookie_value(&headers, "__Host-refresh_token"),
            Some("a.b.c".to_string())
        );
        assert_eq!(cookie_value(&headers, "lang"), Some("en".to_string()));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[tokio::test]
    async fn test_authenticate_handler() {
        let state = AppStateBuilder::new().with_user(test_user(1)).build();
        let response = app(state)
            .oneshot(login_request("user1@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();

        let tokens: TokenPair = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(set_cookie.starts_with(&format!("__Host-refresh_token={};", tokens.refresh_token)));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Secure"));
        assert!(set_cookie.contains("SameSite=Strict"));
    }

    #[tokio::test]
    async fn test_authenticate_bad_password() {
        let state = AppStateBuilder::new().with_user(test_user(1)).build();
        let response = app(state)
            .oneshot(login_request("user1@example.com", "nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "invalid credentials");
    }

    #[tokio::test]
    async fn test_authenticate_malformed_json() {
        let state = AppStateBuilder::new().build();
        let request = Request::builder()
            .method("POST")
            .uri("/authenticate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\":"))
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn test_refresh_handler_rotates() {
        let state = AppStateBuilder::new().with_user(test_user(2)).build();
        let app = app(state);

        let login = app
            .clone()
            .oneshot(login_request("user2@example.com", TEST_PASSWORD))
            .await
            .unwrap();
        let tokens: TokenPair = serde_json::from_slice(&body_bytes(login).await).unwrap();

        let request = Request::builder()
            .uri("/refresh")
            .header(
                header::COOKIE,
                format!("__Host-refresh_token={}", tokens.refresh_token),
            )
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_some());
        let rotated: TokenPair = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(!rotated.access_token.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_handler_without_cookie() {
        let state = AppStateBuilder::new().build();
        let request = Request::builder()
            .uri("/refresh")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["message"], "unauthorized");
    }

    #[tokio::test]
    async fn test_logout_handler() {
        let state = AppStateBuilder::new().build();
        let request = Request::builder()
            .uri("/logout")
            .body(Body::empty())
            .unwrap();

        let response = app(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("__Host-refresh_token=;"));
        assert!(set_cookie.contains("Max-Age=0"));
        assert!(body_bytes(response).await.is_empty());
    }
}
