//! Backend availability state (the circuit).
//!
//! # States
//! - Closed (`is_available = true`): requests leave the process
//! - Open (`is_available = false`): the gatekeeper cancels requests
//!
//! # State Transitions
//! ```text
//! Closed → Open: normalizer observes NetworkUnreachable, or a probe fails
//! Open → Closed: a probe succeeds
//! ```
//!
//! # Design Decisions
//! - One instance per client, shared via Arc and injected into every user
//! - Point writes on atomics; readers never block

use std::sync::atomic::{AtomicBool, Ordering};

use crate::observability::metrics;

/// Shared circuit state.
#[derive(Debug)]
pub struct AvailabilityState {
    is_available: AtomicBool,
    probe_in_progress: AtomicBool,
}

impl AvailabilityState {
    /// Starts closed until the first probe says otherwise.
    pub fn new() -> Self {
        Self {
            is_available: AtomicBool::new(true),
            probe_in_progress: AtomicBool::new(false),
        }
    }

    pub fn is_available(&self) -> bool {
        self.is_available.load(Ordering::Acquire)
    }

    pub fn probe_in_progress(&self) -> bool {
        self.probe_in_progress.load(Ordering::Acquire)
    }

    /// Open the circuit. Returns true if this call changed the state.
    pub fn mark_unavailable(&self) -> bool {
        let was_available = self.is_available.swap(false, Ordering::AcqRel);
        if was_available {
            tracing::warn!("Backend marked unavailable, circuit open");
            metrics::record_backend_available(false);
        }
        was_available
    }

    pub(crate) fn set_available(&self, available: bool) {
        let previous = self.is_available.swap(available, Ordering::AcqRel);
        if previous != available {
            tracing::info!(available, "Backend availability changed");
        }
        metrics::record_backend_available(available);
    }

    /// Claim the probe slot. `None` when another probe is already running.
    pub(crate) fn try_begin_probe(&self) -> Option<ProbeGuard<'_>> {
        self.probe_in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProbeGuard { state: self })
    }
}

impl Default for AvailabilityState {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the probe slot on drop, including when the probe future is cancelled.
#[derive(Debug)]
pub(crate) struct ProbeGuard<'a> {
    state: &'a AvailabilityState,
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        self.state.probe_in_progress.store(false, Ordering::Release);
    }
}
