//! Gated HTTP layer.
//!
//! # Data Flow
//! ```text
//! ApiRequest (request.rs)
//!     → gatekeeper.rs (circuit open? cancel : attach bearer + request ID)
//!     → reqwest (per-call timeout)
//!     → normalizer.rs (classify, sentinel / session teardown / propagate)
//!     → ApiResponse (response.rs)
//! ```

pub mod client;
pub mod gatekeeper;
pub mod normalizer;
pub mod request;
pub mod response;

pub use client::ApiClient;
pub use request::{ApiRequest, MultipartField, MultipartPayload, RequestBody, X_REQUEST_ID};
pub use response::{ApiResponse, UNAVAILABLE_MARKER};
