//! Token refresh: endpoint client and single-flight coordinator.
//!
//! The [`RefreshCoordinator`] is the state machine guarding the refresh
//! critical section. It has two states:
//!
//! - `Idle`: no refresh call outstanding. The next caller becomes the leader
//!   and performs the network call.
//! - `Refreshing`: a call is outstanding. Every other caller subscribes to
//!   the in-flight outcome and waits; no second network call is issued.
//!
//! All queued callers observe the same outcome as the leader: the same new
//! access token on success, the same error on failure. On failure the
//! coordinator clears the token store and redirects to the login surface
//! before any waiter is released, so no caller can race a stale token out of
//! the store. The in-flight flag is cleared on every exit path; a caller
//! arriving after the flag is cleared starts a fresh cycle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::AuthError;
use crate::navigation::Navigator;
use crate::store::TokenStore;
use crate::types::{is_well_formed, TokenPair, TokenResponse};

/// Outcome of a refresh cycle, shared verbatim with every queued caller.
pub type RefreshOutcome = Result<String, AuthError>;

/// Trait for the refresh endpoint call.
#[async_trait]
pub trait RefreshClient: Send + Sync {
    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// Returns an error if the call fails or the response carries no usable
    /// token payload.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError>;
}

/// Refresh client talking to the backend over HTTP.
///
/// The refresh token is presented as a bearer credential; the endpoint
/// answers with a new access token (and optionally a rotated refresh token).
pub struct HttpRefreshClient {
    http: reqwest::Client,
    refresh_url: String,
}

impl HttpRefreshClient {
    /// Create a client for the given refresh endpoint URL.
    #[must_use]
    pub fn new(refresh_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), refresh_url)
    }

    /// Create a client reusing an existing `reqwest` connection pool.
    #[must_use]
    pub fn with_client(http: reqwest::Client, refresh_url: impl Into<String>) -> Self {
        Self { http, refresh_url: refresh_url.into() }
    }
}

#[async_trait]
impl RefreshClient for HttpRefreshClient {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        debug!(url = %self.refresh_url, "calling refresh endpoint");

        let response = self
            .http
            .post(&self.refresh_url)
            .bearer_auth(refresh_token)
            .send()
            .await
            .map_err(|err| AuthError::RefreshFailed(format!("refresh request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed(format!(
                "refresh endpoint returned status {status}"
            )));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|err| AuthError::RefreshFailed(format!("malformed refresh payload: {err}")))
    }
}

/// Configuration for the refresh coordinator.
#[derive(Debug, Clone)]
pub struct RefreshCoordinatorConfig {
    /// Upper bound on a single refresh call. Timeout counts as refresh
    /// failure so queued callers are never left waiting.
    pub timeout: Duration,

    /// Path of the login surface used for the forced redirect.
    pub login_path: String,
}

impl Default for RefreshCoordinatorConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), login_path: "/login".to_string() }
    }
}

/// Single-flight coordinator for token refresh.
pub struct RefreshCoordinator {
    client: Arc<dyn RefreshClient>,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    config: RefreshCoordinatorConfig,
    // `Some` exactly while a refresh call is outstanding. Guarded by a sync
    // mutex so the Idle -> Refreshing transition has no suspension point.
    in_flight: Mutex<Option<broadcast::Sender<RefreshOutcome>>>,
}

impl RefreshCoordinator {
    /// Create a coordinator over the given collaborators.
    #[must_use]
    pub fn new(
        client: Arc<dyn RefreshClient>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
        config: RefreshCoordinatorConfig,
    ) -> Self {
        Self { client, store, navigator, config, in_flight: Mutex::new(None) }
    }

    /// Obtain a fresh access token after an authentication-expiry signal.
    ///
    /// The first caller to observe expiry performs the refresh; concurrent
    /// callers wait for that call's outcome instead of issuing their own.
    ///
    /// # Errors
    /// Returns the shared refresh error when the cycle fails. The store has
    /// been cleared and the login redirect issued by the time this returns.
    pub async fn refresh_access_token(&self) -> RefreshOutcome {
        let waiter = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.as_ref() {
                Some(tx) => Some(tx.subscribe()),
                None => {
                    let (tx, _rx) = broadcast::channel(1);
                    *in_flight = Some(tx);
                    None
                }
            }
        };

        if let Some(mut rx) = waiter {
            debug!("refresh already in flight, waiting for its outcome");
            return match rx.recv().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    Err(AuthError::RefreshFailed("refresh settled without an outcome".to_string()))
                }
            };
        }

        info!("starting token refresh");
        let outcome = self.run_refresh().await;

        match &outcome {
            Ok(_) => info!("token refresh succeeded"),
            Err(err) => {
                warn!(error = %err, "token refresh failed, forcing re-login");
                self.force_logout().await;
            }
        }

        // Clear the in-flight flag before releasing waiters; a caller that
        // arrives now starts a new cycle instead of joining a settled one.
        let settled = self.in_flight.lock().take();
        if let Some(tx) = settled {
            let _ = tx.send(outcome.clone());
        }

        outcome
    }

    /// Whether a refresh call is currently outstanding.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    async fn run_refresh(&self) -> RefreshOutcome {
        let stored = self.store.load().await?;
        let refresh_token = stored
            .as_ref()
            .and_then(|tokens| tokens.refresh_token.clone())
            .ok_or(AuthError::MissingRefreshToken)?;

        if !is_well_formed(&refresh_token) {
            return Err(AuthError::MalformedToken(
                "stored refresh token is not well-formed".to_string(),
            ));
        }

        let response =
            match tokio::time::timeout(self.config.timeout, self.client.refresh(&refresh_token))
                .await
            {
                Ok(result) => result?,
                Err(_) => return Err(AuthError::Timeout(self.config.timeout)),
            };

        if !is_well_formed(&response.access_token) {
            return Err(AuthError::RefreshFailed(
                "refresh endpoint returned a malformed access token".to_string(),
            ));
        }

        // Keep the previous refresh token unless the endpoint rotated it.
        let rotated = response.refresh_token.filter(|token| is_well_formed(token));
        let pair = TokenPair::new(
            response.access_token.clone(),
            rotated.or(Some(refresh_token)),
        );
        self.store.save(&pair).await?;

        Ok(response.access_token)
    }

    /// Failure transition: destroy the credentials and land on the login
    /// surface. The redirect is skipped when already there.
    async fn force_logout(&self) {
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "failed to clear token store during forced logout");
        }

        if self.navigator.current_path() != self.config.login_path {
            self.navigator.navigate(&self.config.login_path);
        }
    }
}
