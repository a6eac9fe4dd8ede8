//! Client error taxonomy.
//!
//! Errors surfaced to callers are final: by the time a `ClientError` leaves
//! the client, recovery (the single refresh-and-replay cycle) has already
//! been attempted or ruled out.

use std::time::Duration;

use drivehub_auth::AuthError;
use thiserror::Error;

/// API operation errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication failed and could not be recovered by refresh.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Rate limit exceeded (429).
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),

    /// Server-side error (5xx).
    #[error("server error: {0}")]
    Server(String),

    /// Client-side error (4xx other than auth).
    #[error("client error: {0}")]
    Client(String),

    /// Network or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Client misconfiguration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Request did not complete within the configured timeout.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
}

impl From<AuthError> for ClientError {
    fn from(err: AuthError) -> Self {
        Self::Auth(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_converts_to_auth_variant() {
        let err: ClientError = AuthError::MissingRefreshToken.into();
        assert!(matches!(err, ClientError::Auth(_)));
        assert!(err.to_string().contains("no refresh token"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            ClientError::Server("boom".to_string()).to_string(),
            "server error: boom"
        );
        assert!(ClientError::Timeout(Duration::from_secs(30)).to_string().contains("30s"));
    }
}
