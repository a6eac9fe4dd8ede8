//! The shared API client.
//!
//! Composes the request authenticator (outbound) and the refresh recovery
//! pipeline (inbound) around a single `reqwest` connection pool. This is the
//! only entry point pages and hooks use to reach the backend.

use std::sync::Arc;
use std::time::Duration;

use drivehub_auth::{RefreshCoordinator, TokenStore};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::authenticator::RequestAuthenticator;
use crate::errors::ClientError;
use crate::request::{RequestDescriptor, RequestOptions};

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for the backend (e.g. "https://api.drivehub.example").
    pub base_url: String,
    /// Timeout for individual requests.
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.drivehub.example".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// HTTP client with transparent bearer auth and expiry recovery.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiClientConfig,
    authenticator: RequestAuthenticator,
    coordinator: Arc<RefreshCoordinator>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { http, config, authenticator: RequestAuthenticator::new(store), coordinator })
    }

    /// Create a builder for fluent configuration.
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Execute a GET request.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(RequestDescriptor::new(Method::GET, path)).await
    }

    /// Execute a GET request with per-call options.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        self.send(RequestDescriptor::new(Method::GET, path).with_options(options)).await
    }

    /// Execute a POST request with a JSON body.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = encode_body(body)?;
        self.send(RequestDescriptor::new(Method::POST, path).with_body(body)).await
    }

    /// Execute a PUT request with a JSON body.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = encode_body(body)?;
        self.send(RequestDescriptor::new(Method::PUT, path).with_body(body)).await
    }

    /// Execute a PATCH request with a JSON body.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = encode_body(body)?;
        self.send(RequestDescriptor::new(Method::PATCH, path).with_body(body)).await
    }

    /// Execute a DELETE request.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be
    /// deserialized.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(RequestDescriptor::new(Method::DELETE, path)).await
    }

    /// Execute an arbitrary request descriptor and deserialize the response.
    ///
    /// # Errors
    /// Returns an error if the request fails, recovery fails, or the response
    /// cannot be deserialized.
    pub async fn send<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, ClientError> {
        let path = descriptor.path.clone();
        debug!(method = %descriptor.method, path = %path, "dispatching request");

        let response = self.execute(descriptor).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &path, &body));
        }

        // 204/205 carry no body by spec; deserialize from null so `()`
        // response types work.
        let result: T = if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT
        {
            serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ClientError::Client(format!(
                    "no-content response ({}), but response type cannot be deserialized \
                     from an empty body",
                    status.as_u16()
                ))
            })?
        } else {
            response
                .json()
                .await
                .map_err(|err| ClientError::Client(format!("failed to parse response: {err}")))?
        };

        debug!(path = %path, "request successful");
        Ok(result)
    }

    /// Run a request through the recovery pipeline.
    ///
    /// An authentication-expiry response on a not-yet-replayed request
    /// triggers (or joins) the coordinated refresh, then replays the request
    /// exactly once with the fresh token. Everything else is surfaced
    /// unchanged.
    async fn execute(&self, descriptor: RequestDescriptor) -> Result<Response, ClientError> {
        let bearer = self.authenticator.bearer_token().await;
        let response = self.dispatch(&descriptor, bearer.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !descriptor.retried() {
            info!(path = %descriptor.path, "access token rejected, attempting refresh");
            let fresh = self.coordinator.refresh_access_token().await?;
            let replay = descriptor.mark_retried();
            return self.dispatch(&replay, Some(&fresh)).await;
        }

        Ok(response)
    }

    async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.config.base_url, descriptor.path);
        let mut builder = self.http.request(descriptor.method.clone(), &url);

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }
        for (name, value) in &descriptor.options.headers {
            builder = builder.header(name, value);
        }
        if !descriptor.options.query.is_empty() {
            builder = builder.query(&descriptor.options.query);
        }
        if let Some(body) = &descriptor.body {
            builder = builder.json(body);
        }

        builder.send().await.map_err(|err| {
            if err.is_timeout() {
                ClientError::Timeout(self.config.timeout)
            } else {
                ClientError::Network(format!("{url}: {err}"))
            }
        })
    }
}

fn encode_body<B: Serialize>(body: &B) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(body)
        .map_err(|err| ClientError::Client(format!("failed to serialize body: {err}")))
}

fn map_status_error(status: StatusCode, path: &str, body: &str) -> ClientError {
    let message = if body.is_empty() {
        format!("{path} returned status {status}")
    } else {
        format!("{path} returned status {status}: {body}")
    };

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        ClientError::Auth(message)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        ClientError::RateLimit(message)
    } else if status.is_server_error() {
        ClientError::Server(message)
    } else if status.is_client_error() {
        ClientError::Client(message)
    } else {
        ClientError::Network(message)
    }
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ApiClientConfig>,
    store: Option<Arc<dyn TokenStore>>,
    coordinator: Option<Arc<RefreshCoordinator>>,
}

impl ApiClientBuilder {
    /// Set the client configuration.
    #[must_use]
    pub fn config(mut self, config: ApiClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the token store.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the refresh coordinator.
    #[must_use]
    pub fn coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    /// Build the API client.
    ///
    /// # Errors
    /// Returns an error if required collaborators are missing or client
    /// creation fails.
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let config = self.config.unwrap_or_default();
        let store = self
            .store
            .ok_or_else(|| ClientError::Config("token store not set".to_string()))?;
        let coordinator = self
            .coordinator
            .ok_or_else(|| ClientError::Config("refresh coordinator not set".to_string()))?;

        ApiClient::new(config, store, coordinator)
    }
}
