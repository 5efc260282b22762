//! Persisted "backend temporarily unavailable" flag.
//!
//! # Responsibilities
//! - Hold a `{ set, expires_at }` value with a fixed TTL
//! - Answer "is the flag active?" through one accessor (`check`)
//! - Persist the flag so it survives a restart
//!
//! # Design Decisions
//! - Expiry is evaluated only in `UnavailabilityFlag::state_at`
//! - Persistence is best-effort: write failures are logged, never surfaced

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::observability::metrics;

/// The flag value as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UnavailabilityFlag {
    pub set: bool,
    /// Expiry in milliseconds since the Unix epoch.
    pub expires_at: u64,
}

/// Result of reading the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagState {
    Clear,
    Active { remaining: Duration },
    /// The flag was set but its TTL has elapsed. It is cleared by the read.
    Expired,
}

impl UnavailabilityFlag {
    pub fn cleared() -> Self {
        Self::default()
    }

    pub fn set_until(expires_at: u64) -> Self {
        Self { set: true, expires_at }
    }

    pub fn state_at(&self, now_ms: u64) -> FlagState {
        if !self.set {
            FlagState::Clear
        } else if self.expires_at > now_ms {
            FlagState::Active {
                remaining: Duration::from_millis(self.expires_at - now_ms),
            }
        } else {
            FlagState::Expired
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Shared, optionally persisted holder of the flag.
pub struct FlagStore {
    current: ArcSwap<UnavailabilityFlag>,
    ttl: Duration,
    persistence_path: Option<PathBuf>,
}

impl FlagStore {
    /// In-memory store.
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: ArcSwap::from_pointee(UnavailabilityFlag::cleared()),
            ttl,
            persistence_path: None,
        }
    }

    /// Persist future changes to `path` without reading it.
    pub fn persist_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.persistence_path = Some(path.into());
        self
    }

    /// Store backed by `path`, loading the previous value if the file exists.
    pub fn load_from_file(path: &Path, ttl: Duration) -> std::io::Result<Self> {
        let store = Self::new(ttl).persist_to(path);

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let flag: UnavailabilityFlag = serde_json::from_reader(reader)?;
            tracing::info!(set = flag.set, expires_at = flag.expires_at, "Loaded unavailability flag");
            store.current.store(Arc::new(flag));
        }
        Ok(store)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current raw value, without evaluating expiry.
    pub fn snapshot(&self) -> UnavailabilityFlag {
        **self.current.load()
    }

    /// Read the flag, clearing it if it has expired.
    pub fn check(&self) -> FlagState {
        let loaded = self.current.load_full();
        let state = loaded.state_at(now_ms());

        if state == FlagState::Expired {
            let previous = self
                .current
                .compare_and_swap(&loaded, Arc::new(UnavailabilityFlag::cleared()));
            if Arc::ptr_eq(&*previous, &loaded) {
                tracing::info!("Unavailability flag expired");
                metrics::record_unavailable_flag(false);
                self.save(&UnavailabilityFlag::cleared());
            }
        }
        state
    }

    /// Set the flag for one TTL from now.
    pub fn set(&self) {
        let flag = UnavailabilityFlag::set_until(now_ms() + self.ttl.as_millis() as u64);
        self.current.store(Arc::new(flag));
        tracing::warn!(cooldown_ms = self.ttl.as_millis() as u64, "Backend flagged unavailable");
        metrics::record_unavailable_flag(true);
        self.save(&flag);
    }

    /// Clear the flag if it is set.
    pub fn clear(&self) {
        if !self.current.load().set {
            return;
        }
        self.current.store(Arc::new(UnavailabilityFlag::cleared()));
        tracing::info!("Unavailability flag cleared");
        metrics::record_unavailable_flag(false);
        self.save(&UnavailabilityFlag::cleared());
    }

    fn save(&self, flag: &UnavailabilityFlag) {
        let Some(path) = &self.persistence_path else {
            return;
        };
        let result = File::create(path).and_then(|file| {
            serde_json::to_writer(BufWriter::new(file), flag).map_err(std::io::Error::from)
        });
        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist unavailability flag");
        }
    }
}

impl std::fmt::Debug for FlagStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagStore")
            .field("current", &self.snapshot())
            .field("ttl", &self.ttl)
            .field("persistence_path", &self.persistence_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_at() {
        let flag = UnavailabilityFlag::set_until(10_000);
        assert_eq!(
            flag.state_at(4_000),
            FlagState::Active { remaining: Duration::from_millis(6_000) }
        );
        assert_eq!(flag.state_at(10_000), FlagState::Expired);
        assert_eq!(UnavailabilityFlag::cleared().state_at(0), FlagState::Clear);
    }

    #[test]
    fn test_set_and_clear() {
        let store = FlagStore::new(Duration::from_secs(60));
        assert_eq!(store.check(), FlagState::Clear);

        store.set();
        assert!(matches!(store.check(), FlagState::Active { .. }));

        store.clear();
        assert_eq!(store.check(), FlagState::Clear);
    }

    #[test]
    fn test_expiry_clears_on_read() {
        let store = FlagStore::new(Duration::from_millis(20));
        store.set();
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(store.check(), FlagState::Expired);
        assert!(!store.snapshot().set);
        assert_eq!(store.check(), FlagState::Clear);
    }

    #[test]
    fn test_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unavailable.json");

        let store = FlagStore::load_from_file(&path, Duration::from_secs(60)).unwrap();
        store.set();
        let expires_at = store.snapshot().expires_at;

        // Load new instance, as after a restart
        let reloaded = FlagStore::load_from_file(&path, Duration::from_secs(60)).unwrap();
        assert_eq!(reloaded.snapshot(), UnavailabilityFlag::set_until(expires_at));
        assert!(matches!(reloaded.check(), FlagState::Active { .. }));

        reloaded.clear();
        let cleared = FlagStore::load_from_file(&path, Duration::from_secs(60)).unwrap();
        assert_eq!(cleared.check(), FlagState::Clear);
    }
}
