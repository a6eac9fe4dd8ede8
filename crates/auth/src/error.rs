//! Auth error types.
//!
//! Every variant is cheap to clone so a single refresh outcome can be fanned
//! out verbatim to all callers queued behind the in-flight refresh.

use std::time::Duration;

use thiserror::Error;

/// Errors produced by token storage and the refresh path.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Token store operation failed.
    #[error("token store error: {0}")]
    Store(String),

    /// No tokens are stored.
    #[error("not authenticated (no tokens stored)")]
    NotAuthenticated,

    /// A refresh was requested but no refresh token exists.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// A token failed the structural three-segment check.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The refresh call failed or returned an unusable payload.
    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    /// The refresh call did not settle within the configured bound.
    #[error("token refresh timed out after {0:?}")]
    Timeout(Duration),
}
