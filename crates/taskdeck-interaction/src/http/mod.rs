//! HTTP plumbing shared by the auth session and the API client.

pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fake;
pub mod headers;
pub mod request;
pub mod transport;

pub use error::error_from_response;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTransport;
pub use headers::DefaultHeaders;
pub use request::{AUTHORIZATION, ApiRequest, ApiResponse, Method};
pub use transport::{HttpContext, HttpTransport, ReqwestTransport};
