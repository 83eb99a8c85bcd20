use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::shared::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// GET /
pub async fn home() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "active".to_string(),
        message: "Go movies up and running".to_string(),
        version: "1.0.0".to_string(),
    })
}

/// Full application router
pub fn app(state: AppState) -> Router {
    let admin = Router::new()
        .route("/whoami", get(auth::whoami))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(home))
        .route("/authenticate", post(auth::authenticate))
        .route("/refresh", get(auth::refresh_token))
        .route("/logout", get(auth::logout))
        .nest("/admin", admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
