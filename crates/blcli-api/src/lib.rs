#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(unreachable_pub, clippy::all, clippy::pedantic, clippy::nursery)]

//! Typed access to the BitLaunch provisioning API.
//!
//! Layout:
//! - `models.rs`: request and response DTOs
//! - `service.rs`: the [`RemoteService`] trait consumed by the CLI
//! - `http.rs`: the reqwest-backed implementation
//! - `error.rs`: classified API failures

pub mod error;
pub mod http;
pub mod models;
pub mod service;

pub use error::{ApiError, ApiResult};
pub use http::{DEFAULT_API_URL, HttpConfig, HttpRemoteService};
pub use service::RemoteService;
