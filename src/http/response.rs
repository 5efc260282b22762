//! Normalized responses.
//!
//! # Design Decisions
//! - Degraded-network failures resolve to a sentinel response (no data)
//!   instead of an error, so the orchestrator only inspects response shape
//! - `status` is 0 when the failure carried no HTTP status

use serde::de::DeserializeOwned;

use crate::error::GatewayResult;
use crate::resilience::classifier::ErrorKind;

/// Status-text marker carried by sentinel responses.
pub const UNAVAILABLE_MARKER: &str = "SERVICE_UNAVAILABLE";

/// A completed call, or the sentinel standing in for a degraded one.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = serde_json::Value> {
    pub data: Option<T>,
    pub status: u16,
    pub status_text: String,
    /// Kind of the absorbed failure, for sentinels.
    pub failure: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, status: u16, status_text: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            status,
            status_text: status_text.into(),
            failure: None,
        }
    }

    /// Sentinel for an absorbed transport failure.
    pub fn unavailable(status: u16, kind: ErrorKind) -> Self {
        Self {
            data: None,
            status,
            status_text: UNAVAILABLE_MARKER.to_string(),
            failure: Some(kind),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.data.is_none() && self.status_text == UNAVAILABLE_MARKER
    }

    /// Empty payload or error status: the caller should substitute.
    pub fn is_soft_failure(&self) -> bool {
        self.data.is_none() || self.status >= 400
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            data: self.data.map(f),
            status: self.status,
            status_text: self.status_text,
            failure: self.failure,
        }
    }
}

impl ApiResponse<serde_json::Value> {
    /// Deserialize the payload, keeping sentinels as sentinels.
    pub fn decode<T: DeserializeOwned>(self) -> GatewayResult<ApiResponse<T>> {
        let data = match self.data {
            Some(value) => Some(serde_json::from_value(value)?),
            None => None,
        };
        Ok(ApiResponse {
            data,
            status: self.status,
            status_text: self.status_text,
            failure: self.failure,
        })
    }
}
