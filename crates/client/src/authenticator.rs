//! Outbound request authentication.

use std::sync::Arc;

use drivehub_auth::{is_well_formed, TokenStore};
use tracing::debug;

/// Attaches credentials to outgoing requests without mutating caller intent.
///
/// Reads the access token from the store and yields it only when it passes
/// the structural check. This step never blocks or fails the request:
/// a missing, malformed, or unreadable token simply leaves the request
/// unauthenticated so public endpoints keep working.
pub struct RequestAuthenticator {
    store: Arc<dyn TokenStore>,
}

impl RequestAuthenticator {
    /// Create an authenticator reading from the given store.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// The bearer token to attach, if a structurally valid one is stored.
    pub async fn bearer_token(&self) -> Option<String> {
        match self.store.load().await {
            Ok(Some(pair)) if is_well_formed(&pair.access_token) => Some(pair.access_token),
            Ok(Some(_)) => {
                debug!("stored access token is malformed, sending request unauthenticated");
                None
            }
            Ok(None) => None,
            Err(err) => {
                debug!(error = %err, "token store unavailable, sending request unauthenticated");
                None
            }
        }
    }
}
