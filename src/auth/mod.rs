// Public API - what other modules can use
pub use claims::{Claims, Identity};
pub use config::{AuthConfig, DEFAULT_COOKIE_NAME};
pub use cookie::{CookieManager, RefreshCookie};
pub use errors::AuthError;
pub use handlers::{authenticate, logout, refresh_token, whoami, LoginRequest, WhoAmIResponse};
pub use issuer::{TokenIssuer, TokenPair};
pub use middleware::require_auth;
pub use service::{AuthService, IssuedSession};
pub use validator::TokenValidator;

// Internal modules
mod claims;
mod config;
mod cookie;
mod errors;
mod handlers;
pub mod issuer;
mod middleware;
pub mod service;
mod validator;
