//! Mock collaborators for tests.
//!
//! Shared by this crate's unit tests and by `drivehub-client` integration
//! tests. Not intended for production use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AuthError;
use crate::navigation::Navigator;
use crate::refresh::RefreshClient;
use crate::types::TokenResponse;

/// Navigator that records every redirect it receives.
pub struct RecordingNavigator {
    current: Mutex<String>,
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a navigator positioned at the given path.
    #[must_use]
    pub fn new(initial_path: &str) -> Self {
        Self {
            current: Mutex::new(initial_path.to_string()),
            visited: Mutex::new(Vec::new()),
        }
    }

    /// All paths navigated to, in order.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().clone()
    }

    fn navigate(&self, path: &str) {
        *self.current.lock() = path.to_string();
        self.visited.lock().push(path.to_string());
    }
}

/// Refresh client returning a canned outcome after an optional delay.
///
/// Counts invocations so tests can assert the at-most-one-refresh property.
pub struct StubRefreshClient {
    outcome: Mutex<Result<TokenResponse, AuthError>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl StubRefreshClient {
    /// Client that yields a well-formed access token (and no rotation).
    #[must_use]
    pub fn succeeding(access_token: &str) -> Self {
        Self::with_outcome(Ok(TokenResponse {
            access_token: access_token.to_string(),
            refresh_token: None,
        }))
    }

    /// Client that fails every refresh with the given error.
    #[must_use]
    pub fn failing(error: AuthError) -> Self {
        Self::with_outcome(Err(error))
    }

    /// Client with an arbitrary canned outcome.
    #[must_use]
    pub fn with_outcome(outcome: Result<TokenResponse, AuthError>) -> Self {
        Self { outcome: Mutex::new(outcome), delay: Duration::ZERO, calls: AtomicUsize::new(0) }
    }

    /// Delay each refresh call, keeping the coordinator in `Refreshing` long
    /// enough for concurrent callers to queue up.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the canned outcome for subsequent calls.
    pub fn set_outcome(&self, outcome: Result<TokenResponse, AuthError>) {
        *self.outcome.lock() = outcome;
    }

    /// Number of refresh calls issued so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshClient for StubRefreshClient {
    async fn refresh(&self, _refresh_token: &str) -> Result<TokenResponse, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.lock().clone()
    }
}
