//! Token types and structural validation.
//!
//! Tokens are opaque string credentials. The SDK never inspects claims or
//! verifies signatures; the only check applied anywhere is the three-segment
//! well-formedness test below, which filters out values that cannot possibly
//! be signed tokens before they are attached to a request or accepted from
//! the refresh endpoint.

use serde::{Deserialize, Serialize};

/// Check whether a token string is structurally valid.
///
/// A token must split into exactly three non-empty dot-separated segments.
/// Anything else (empty string, missing segments, empty segments) is treated
/// the same as having no token at all.
#[must_use]
pub fn is_well_formed(token: &str) -> bool {
    let mut segments = 0usize;
    for segment in token.split('.') {
        if segment.is_empty() {
            return false;
        }
        segments += 1;
    }
    segments == 3
}

/// The access/refresh token pair held by the token store.
///
/// At most one pair exists at a time. It is created by login/registration,
/// overwritten on every successful refresh, and destroyed on logout or on
/// terminal refresh failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential sent with each authenticated request.
    pub access_token: String,

    /// Longer-lived credential sent only to the refresh endpoint.
    /// Optional because a session can outlive its refresh token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Create a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: Option<String>) -> Self {
        Self { access_token, refresh_token }
    }

    /// Whether the access token passes the structural check.
    #[must_use]
    pub fn has_usable_access_token(&self) -> bool {
        is_well_formed(&self.access_token)
    }
}

/// Token payload returned by the login, registration, and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Fresh access token delivered by the endpoint.
    pub access_token: String,

    /// Present when the backend rotates the refresh token.
    pub refresh_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_requires_exactly_three_segments() {
        assert!(is_well_formed("header.payload.signature"));
        assert!(is_well_formed("a.b.c"));

        assert!(!is_well_formed(""));
        assert!(!is_well_formed("no-dots-at-all"));
        assert!(!is_well_formed("only.two"));
        assert!(!is_well_formed("one.too.many.segments"));
    }

    #[test]
    fn well_formed_rejects_empty_segments() {
        assert!(!is_well_formed("a..c"));
        assert!(!is_well_formed(".b.c"));
        assert!(!is_well_formed("a.b."));
        assert!(!is_well_formed(".."));
    }

    #[test]
    fn token_pair_usable_access_token() {
        let pair = TokenPair::new("a.b.c".to_string(), None);
        assert!(pair.has_usable_access_token());

        let pair = TokenPair::new("garbage".to_string(), Some("a.b.c".to_string()));
        assert!(!pair.has_usable_access_token());
    }

    #[test]
    fn token_pair_serde_roundtrip() {
        let pair = TokenPair::new("a.b.c".to_string(), Some("d.e.f".to_string()));
        let json = serde_json::to_string(&pair).expect("serialize");
        let back: TokenPair = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, pair);
    }

    #[test]
    fn token_pair_omits_missing_refresh_token() {
        let pair = TokenPair::new("a.b.c".to_string(), None);
        let json = serde_json::to_string(&pair).expect("serialize");
        assert!(!json.contains("refresh_token"));
    }

    #[test]
    fn token_response_without_rotation() {
        let json = r#"{"access_token":"a.b.c"}"#;
        let response: TokenResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.access_token, "a.b.c");
        assert!(response.refresh_token.is_none());
    }
}
