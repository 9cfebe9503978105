// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Location provider contract and exclusive access to it.
//!
//! A provider is a single shared resource. Sessions never call `start`/`stop`
//! directly; they acquire a [`LocationLease`] from the [`LocationGate`], and
//! the lease stops the provider when it is dropped.

use crate::models::LocationSample;
use crate::services::recording::RecordingError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Source of position updates.
pub trait LocationProvider: Send + Sync {
    /// Begin producing position updates.
    fn start(&self);

    /// Stop producing position updates.
    fn stop(&self);

    /// Most recent known position, if any.
    fn current_position(&self) -> Option<LocationSample>;
}

/// Hands out at most one lease on a provider at a time.
#[derive(Clone)]
pub struct LocationGate {
    provider: Arc<dyn LocationProvider>,
    held: Arc<AtomicBool>,
}

impl LocationGate {
    pub fn new(provider: Arc<dyn LocationProvider>) -> Self {
        Self {
            provider,
            held: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Take exclusive use of the provider and start it.
    pub fn acquire(&self) -> Result<LocationLease, RecordingError> {
        if self
            .held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RecordingError::ProviderBusy);
        }

        self.provider.start();
        tracing::debug!("Location provider acquired");

        Ok(LocationLease {
            provider: self.provider.clone(),
            held: self.held.clone(),
        })
    }

    /// Whether a lease is currently outstanding.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    pub fn current_position(&self) -> Option<LocationSample> {
        self.provider.current_position()
    }
}

/// Exclusive, running subscription to the provider. Stops it on drop.
pub struct LocationLease {
    provider: Arc<dyn LocationProvider>,
    held: Arc<AtomicBool>,
}

impl LocationLease {
    pub fn current_position(&self) -> Option<LocationSample> {
        self.provider.current_position()
    }
}

impl Drop for LocationLease {
    fn drop(&mut self) {
        self.provider.stop();
        self.held.store(false, Ordering::Release);
        tracing::debug!("Location provider released");
    }
}

/// Provider fed by positions a device reports to the service.
///
/// Reports are only published while the provider is started.
pub struct ReportedLocation {
    active: AtomicBool,
    latest: watch::Sender<Option<LocationSample>>,
}

impl Default for ReportedLocation {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportedLocation {
    pub fn new() -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            active: AtomicBool::new(false),
            latest,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Publish a reported position. Returns the sample if it was accepted.
    pub fn report(&self, sample: LocationSample) -> Option<LocationSample> {
        if !self.is_active() {
            tracing::debug!("Ignoring position report while provider is stopped");
            return None;
        }
        self.latest.send_replace(Some(sample));
        Some(sample)
    }

    /// Observe position updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<LocationSample>> {
        self.latest.subscribe()
    }
}

impl LocationProvider for ReportedLocation {
    fn start(&self) {
        self.active.store(true, Ordering::Release);
    }

    fn stop(&self) {
        self.active.store(false, Ordering::Release);
        // A stale fix must not seed the next recording.
        self.latest.send_replace(None);
    }

    fn current_position(&self) -> Option<LocationSample> {
        *self.latest.borrow()
    }
}
