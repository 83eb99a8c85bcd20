use axum::Router;
use std::sync::Arc;

use movies_api::{routes, AppState, AuthConfig, InMemoryUserRepository, UserModel};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const PASSWORD: &str = "password";

pub struct TestSetup {
    pub app: Router,
    pub users: Arc<InMemoryUserRepository>,
    pub auth_config: AuthConfig,
}

pub struct TestSetupBuilder {
    users: Vec<(i64, String)>,
    auth_config: AuthConfig,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            auth_config: AuthConfig::new("example.com", "example.com", "integration-secret")
                .with_cookie("__Host-refresh_token", "/", ""),
        }
    }

    pub fn with_user(mut self, id: i64, email: &str) -> Self {
        self.users.push((id, email.to_string()));
        self
    }

    pub fn with_admin(self) -> Self {
        self.with_user(1, "admin@example.com")
    }

    pub fn build(self) -> TestSetup {
        let users = self
            .users
            .iter()
            .map(|(id, email)| UserModel::new(*id, email, "Test", "User", PASSWORD).unwrap())
            .collect();
        let users = Arc::new(InMemoryUserRepository::with_users(users));

        let app = routes::app(AppState::new(users.clone(), self.auth_config.clone()));

        TestSetup {
            app,
            users,
            auth_config: self.auth_config,
        }
    }
}
