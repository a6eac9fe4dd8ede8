//! Token lifecycle for the DriveHub client SDK.
//!
//! Everything auth-related that the HTTP client composes lives here:
//!
//! ```text
//! ┌────────────────────┐
//! │ RefreshCoordinator │  Single-flight refresh state machine
//! └─────────┬──────────┘
//!           │
//!           ├──► RefreshClient   (refresh endpoint call)
//!           ├──► TokenStore      (durable access/refresh token pair)
//!           └──► Navigator       (forced re-login on terminal failure)
//! ```
//!
//! Tokens are opaque strings. The only validation performed anywhere is the
//! structural three-segment check in [`types::is_well_formed`]; a token that
//! fails it is treated as absent.
//!
//! # Module Organization
//!
//! - **[`types`]**: token pair, refresh endpoint payload, structural checks
//! - **[`store`]**: durable token storage (file-backed and in-memory)
//! - **[`refresh`]**: refresh client and the `RefreshCoordinator`
//! - **[`navigation`]**: navigation collaborator for the forced-login redirect
//! - **[`testing`]**: mock collaborators for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod navigation;
pub mod refresh;
pub mod store;
pub mod testing;
pub mod types;

pub use error::AuthError;
pub use navigation::{Navigator, NoopNavigator};
pub use refresh::{HttpRefreshClient, RefreshClient, RefreshCoordinator, RefreshCoordinatorConfig};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{is_well_formed, TokenPair, TokenResponse};
