//! Synchronous client core for the posts/comments/likes service.
//!
//! # Overview
//! `PostsClient` turns each remote operation into an `HttpRequest`, sends it
//! through an injected `Transport`, and decodes the response body into a
//! `serde_json::Value`. The service has no fixed response schema, so callers
//! interpret the returned JSON themselves.
//!
//! # Design
//! - Configuration and identity are fixed at construction; every request URL
//!   is built from a fresh copy of the base URL (`Endpoint::url`).
//! - `build_*` methods expose the request without sending it, so the I/O
//!   boundary stays explicit and testable.
//! - Failures are typed (`ApiError`) and never replaced by defaults.
//! - The `ureq` feature (on by default) provides a blocking `UreqTransport`.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{parse_response, PostsClient};
pub use config::ClientConfig;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use transport::{Transport, TransportError};
pub use types::{CommentFields, Identity, Liker, NewComment, NewPost};
