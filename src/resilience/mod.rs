//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Domain operation:
//!     → fallback.rs (flag check, real call, substitution)
//!         → cascade.rs (AI analysis only: providers in order)
//!             → http client → classifier.rs (failure kind)
//!     → flag.rs (cooldown after network-class failures)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No automatic retries within a call; the cascade and the cooldown are the only "retry"
//! - Substitution happens in exactly one place (fallback.rs)

pub mod cascade;
pub mod classifier;
pub mod fallback;
pub mod flag;

pub use cascade::{CascadeError, CascadeSuccess, ProviderAttempt, ProviderCascade};
pub use classifier::{classify, ClassifiedError, ErrorKind, TransportFailure};
pub use fallback::{DataSource, FallbackOrchestrator, FallbackPolicy, FallbackReason, Sourced};
pub use flag::{FlagState, FlagStore, UnavailabilityFlag};
