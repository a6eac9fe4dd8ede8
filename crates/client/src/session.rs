//! Session management: login, registration, logout.
//!
//! Login and registration are the only writers of tokens besides the refresh
//! coordinator. Logout asks the backend to invalidate the session and then
//! clears the local tokens unconditionally, whatever the backend said.

use std::sync::Arc;

use drivehub_auth::{is_well_formed, TokenPair, TokenResponse, TokenStore};
use serde::Serialize;
use tracing::{info, warn};

use crate::client::ApiClient;
use crate::errors::ClientError;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// Payload for account registration.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationRequest {
    /// Account email, also the login identifier.
    pub email: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
    /// Optional public display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Account session collaborator built on top of [`ApiClient`].
pub struct SessionManager {
    client: Arc<ApiClient>,
    store: Arc<dyn TokenStore>,
}

impl SessionManager {
    /// Create a session manager sharing the client's token store.
    #[must_use]
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn TokenStore>) -> Self {
        Self { client, store }
    }

    /// Log in and persist the delivered token pair.
    ///
    /// # Errors
    /// Returns an error if the backend rejects the credentials or delivers
    /// an unusable access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let response: TokenResponse =
            self.client.post("/auth/login", &Credentials { email, password }).await?;
        self.persist(response).await?;
        info!("session established");
        Ok(())
    }

    /// Register a new account and persist the delivered token pair.
    ///
    /// # Errors
    /// Returns an error if registration fails or the backend delivers an
    /// unusable access token.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<(), ClientError> {
        let response: TokenResponse = self.client.post("/auth/register", request).await?;
        self.persist(response).await?;
        info!("account registered, session established");
        Ok(())
    }

    /// Log out: best-effort backend invalidation, then unconditional local
    /// token destruction.
    ///
    /// # Errors
    /// Returns an error only if clearing the local store fails; a failed
    /// backend call does not keep the session alive.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result: Result<(), ClientError> =
            self.client.post("/auth/logout", &serde_json::json!({})).await;
        if let Err(err) = result {
            warn!(error = %err, "backend logout failed, clearing local tokens anyway");
        }

        self.store.clear().await?;
        info!("session closed");
        Ok(())
    }

    /// Whether a structurally valid access token is stored.
    pub async fn is_authenticated(&self) -> bool {
        matches!(
            self.store.load().await,
            Ok(Some(pair)) if pair.has_usable_access_token()
        )
    }

    async fn persist(&self, response: TokenResponse) -> Result<(), ClientError> {
        if !is_well_formed(&response.access_token) {
            return Err(ClientError::Auth(
                "backend delivered a malformed access token".to_string(),
            ));
        }

        let refresh = response.refresh_token.filter(|token| is_well_formed(token));
        let pair = TokenPair::new(response.access_token, refresh);
        self.store.save(&pair).await?;
        Ok(())
    }
}
