//! Shared HTTP client for the DriveHub marketplace backend.
//!
//! Pages and data hooks talk to the backend exclusively through
//! [`ApiClient`]: verb methods that transparently attach the current access
//! token on the way out and recover from authentication expiry on the way
//! back in. Callers either get a successful response or a final,
//! non-recoverable error; the refresh machinery is invisible to them.
//!
//! ```text
//! caller ──► ApiClient ──► RequestAuthenticator ──► transport
//!                 ▲                                     │
//!                 └── replay (once) ◄── RefreshCoordinator ◄── 401
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use drivehub_auth::{
//!     FileTokenStore, HttpRefreshClient, NoopNavigator, RefreshCoordinator,
//!     RefreshCoordinatorConfig,
//! };
//! use drivehub_client::{ApiClient, ApiClientConfig, SessionManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileTokenStore::new("/var/lib/drivehub/tokens.json"));
//!     let coordinator = Arc::new(RefreshCoordinator::new(
//!         Arc::new(HttpRefreshClient::new("https://api.drivehub.example/auth/refresh")),
//!         store.clone(),
//!         Arc::new(NoopNavigator),
//!         RefreshCoordinatorConfig::default(),
//!     ));
//!
//!     let config = ApiClientConfig {
//!         base_url: "https://api.drivehub.example".into(),
//!         ..Default::default()
//!     };
//!     let client = Arc::new(ApiClient::new(config, store.clone(), coordinator)?);
//!
//!     let session = SessionManager::new(client.clone(), store);
//!     session.login("buyer@example.com", "hunter2").await?;
//!
//!     let listings: serde_json::Value = client.get("/listings").await?;
//!     println!("{listings}");
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod authenticator;
pub mod client;
pub mod errors;
pub mod request;
pub mod session;

pub use authenticator::RequestAuthenticator;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::ClientError;
pub use request::{RequestDescriptor, RequestOptions};
pub use session::{RegistrationRequest, SessionManager};
