use axum::http::StatusCode;

use super::actions::Reply;

impl Reply {
    /// Status, body and cookie of a successful login/refresh
    pub fn assert_session(&self, status: StatusCode, cookie_name: &str) {
        assert_eq!(self.status, status);

        let tokens = self.tokens();
        assert_eq!(tokens.access_token.split('.').count(), 3);
        assert_eq!(tokens.refresh_token.split('.').count(), 3);

        let cookie = self.set_cookie.as_deref().expect("missing Set-Cookie");
        assert!(cookie.starts_with(&format!("{}={};", cookie_name, tokens.refresh_token)));
        for attribute in ["Path=/", "HttpOnly", "Secure", "SameSite=Strict", "Max-Age="] {
            assert!(cookie.contains(attribute), "missing {} in {}", attribute, cookie);
        }
        if cookie_name.starts_with("__Host-") {
            assert!(!cookie.contains("Domain="), "__Host- cookie with Domain: {}", cookie);
        }
    }

    /// `{error: true, message}` body with the given status and no cookie
    pub fn assert_error(&self, status: StatusCode, message: &str) {
        assert_eq!(self.status, status);
        assert!(self.set_cookie.is_none());

        let body = self.json();
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], message);
    }
}
