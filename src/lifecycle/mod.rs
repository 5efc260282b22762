//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Shared state → Gated client → Services → Start-up probe
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core state, then services
//! - Nothing runs in the background; probes happen at start-up and on demand

pub mod startup;

pub use startup::{GatewayClient, StartupError};
