//! Transport failure classification.
//!
//! # Rules (priority order)
//! - Timed out → `Timeout`
//! - No connection, or no HTTP status at all → `NetworkUnreachable`
//! - 401 → `Unauthorized`
//! - 405 → `MethodNotAllowed`
//! - Anything else → `Other`
//!
//! Classification is a pure function; callers decide what to do with the kind.

use std::fmt;

/// Raw failure observed on an outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The call exceeded its timeout budget.
    TimedOut,
    /// The connection could not be established.
    ConnectFailed,
    /// The call failed without a distinguishable HTTP status.
    NoStatus,
    /// The backend answered with a non-success status.
    Status(u16),
    /// The request never left the process (builder/encoding problem).
    Local(String),
}

impl TransportFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportFailure::Status(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<&reqwest::Error> for TransportFailure {
    fn from(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFailure::TimedOut
        } else if err.is_connect() {
            TransportFailure::ConnectFailed
        } else if let Some(status) = err.status() {
            TransportFailure::Status(status.as_u16())
        } else if err.is_builder() {
            TransportFailure::Local(err.to_string())
        } else {
            TransportFailure::NoStatus
        }
    }
}

/// Failure kinds the gateway distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Timeout,
    NetworkUnreachable,
    MethodNotAllowed,
    Unauthorized,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::MethodNotAllowed => "method_not_allowed",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// Whether a soft failure of this kind may be replaced with mock data.
    pub retryable_as_mock: bool,
}

/// Map a raw transport failure to its kind.
pub fn classify(failure: &TransportFailure) -> ClassifiedError {
    let kind = match failure {
        TransportFailure::TimedOut => ErrorKind::Timeout,
        TransportFailure::ConnectFailed | TransportFailure::NoStatus => ErrorKind::NetworkUnreachable,
        TransportFailure::Status(401) => ErrorKind::Unauthorized,
        TransportFailure::Status(405) => ErrorKind::MethodNotAllowed,
        TransportFailure::Status(_) | TransportFailure::Local(_) => ErrorKind::Other,
    };

    ClassifiedError {
        kind,
        retryable_as_mock: kind != ErrorKind::Unauthorized,
    }
}
