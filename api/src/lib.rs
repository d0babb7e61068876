//! Subscan proxy shared between the browser assistant and the proxy server.
//!
//! - **subscan**: wire types and the application-code table
//! - **error**: proxy error taxonomy and its HTTP mapping
//! - **config**: environment-driven proxy configuration (`server` feature)
//! - **client**: upstream Subscan client (`server` feature)
//! - **routes**: axum router exposing `POST /api/subscan/search` (`server` feature)
//!
//! With default features off only the wire types and the status mapping are
//! compiled, which is what the WASM front-end links against.

pub mod error;
pub mod subscan;

#[cfg(feature = "server")]
pub mod client;
#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod routes;

pub use error::{ErrorBody, ProxyError};
pub use subscan::*;
