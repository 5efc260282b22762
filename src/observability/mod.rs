//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gatekeeper / normalizer / orchestrator / cascade / monitor produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape (when the exporter is installed)
//! ```

pub mod logging;
pub mod metrics;
