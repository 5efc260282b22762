//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Active probes (monitor.rs):
//!     start-up / on demand
//!     → GET primary path, then alternate path
//!     → Update state.rs
//!
//! Passive detection (http::normalizer):
//!     NetworkUnreachable observed on a real call
//!     → state.rs opens the circuit immediately
//!
//! State (state.rs):
//!     Available ←→ Unavailable
//! ```

pub mod monitor;
pub mod state;

pub use monitor::AvailabilityMonitor;
pub use state::AvailabilityState;
