use thiserror::Error;

/// Failures of token issuance and validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    Credential,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("invalid token issuer")]
    InvalidIssuer,

    #[error("invalid token audience")]
    InvalidAudience,

    #[error("unknown user")]
    UnknownUser,

    #[error("missing token")]
    MissingToken,
}
