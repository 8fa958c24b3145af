//! Typed async client for the App Store Connect Xcode Cloud API.
//!
//! The client wraps the JSON:API endpoints under `/v1/ci*` and `/v1/scm*`,
//! handling ES256 JWT authentication, error envelope translation, and the
//! long-poll wait loop for build completion.
//!
//! # Example
//!
//! ```no_run
//! use xcc_client::{AuthConfig, XcodeCloudClient};
//!
//! # async fn run() -> xcc_client::Result<()> {
//! let client = XcodeCloudClient::builder()
//!     .auth(AuthConfig::from_env()?)
//!     .build()?;
//!
//! for product in client.products().list(None).await? {
//!     println!("{}: {}", product.id, product.attributes.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;

pub use api::{BuildArtifacts, BuildWaitOutcome, WaitOptions};
pub use auth::{AuthConfig, Clock, SystemClock, TokenAuthenticator};
pub use client::{XcodeCloudClient, XcodeCloudClientBuilder};
pub use config::{ClientConfig, APP_STORE_CONNECT_API_BASE};
pub use error::{Error, Result};
