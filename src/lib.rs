// Library crate for the movies API server
// This file exposes the public API for integration tests

pub mod auth;
pub mod config;
pub mod routes;
pub mod shared;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use auth::{
    AuthConfig, AuthError, AuthService, Claims, Identity, TokenIssuer, TokenPair, TokenValidator,
};
pub use config::Config;
pub use shared::{AppError, AppState};
pub use user::{InMemoryUserRepository, UserModel, UserRepository};
