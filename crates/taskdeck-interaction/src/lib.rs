//! Remote API access for Taskdeck.
//!
//! [`AuthSession`] owns credentials, [`ApiClient`] sends authenticated
//! requests and recovers from expired access tokens.

pub mod auth;
pub mod client;
pub mod http;

pub use auth::AuthSession;
pub use client::ApiClient;
pub use http::{
    ApiRequest, ApiResponse, DefaultHeaders, HttpContext, HttpTransport, Method, ReqwestTransport,
};

#[cfg(any(test, feature = "test-support"))]
pub use http::FakeTransport;
