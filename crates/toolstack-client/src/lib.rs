//! HTTP client for the model service.
//!
//! Provides:
//! - `HttpRemoteClient` - `RemoteClient` over the service's REST API
//! - Wire types for request and response bodies

pub mod http;
pub mod wire;

pub use http::{ClientBuildError, HttpRemoteClient};
