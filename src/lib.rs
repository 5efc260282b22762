//! Resilient API gateway client for the career-services backend.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller (UI action)
//!       │
//!       ▼
//!   services::remote ──▶ resilience::fallback (FallbackOrchestrator)
//!                              │            │
//!                              │            └──▶ services::mocks (substitute)
//!                              ▼
//!                        resilience::cascade (AI analysis only)
//!                              │
//!                              ▼
//!   http::gatekeeper ──▶ reqwest ──▶ http::normalizer ──▶ resilience::classifier
//!        ▲                                  │
//!        └──── health::state ◀──────────────┘
//!                   ▲
//!                   └── health::monitor (probe on demand)
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod services;
pub mod session;

pub use config::schema::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use lifecycle::GatewayClient;
