use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use movies_api::TokenPair;

use super::setup::TestSetup;

/// What came back from one HTTP exchange
pub struct Reply {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    async fn from_response(response: Response) -> Self {
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        Self {
            status,
            set_cookie,
            body,
        }
    }

    pub fn tokens(&self) -> TokenPair {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

impl TestSetup {
    async fn send(&self, request: Request<Body>) -> Reply {
        let response = self.app.clone().oneshot(request).await.unwrap();
        Reply::from_response(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Reply {
        let body = json!({ "email": email, "password": password }).to_string();
        self.send(
            Request::builder()
                .method("POST")
                .uri("/authenticate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn refresh_with(&self, refresh_token: &str) -> Reply {
        self.send(
            Request::builder()
                .uri("/refresh")
                .header(
                    header::COOKIE,
                    format!("{}={}", self.auth_config.cookie_name, refresh_token),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn logout(&self) -> Reply {
        self.send(
            Request::builder()
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn whoami(&self, bearer: &str) -> Reply {
        self.send(
            Request::builder()
                .uri("/admin/whoami")
                .header(header::AUTHORIZATION, format!("Bearer {}", bearer))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn home(&self) -> Reply {
        self.send(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
    }
}
