// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Recording session state machine.
//!
//! ```text
//! NotStarted --start--> InProgress(start) --stop--> Ended(start, end)
//! ```
//!
//! A session holds the location provider only while in progress. Samples that
//! arrive outside `InProgress` are dropped, never reported as errors, since
//! the provider may still emit events around a transition.

use crate::models::{LocationSample, NewRoute, RouteType};
use crate::services::location::{LocationGate, LocationLease};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle state of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecordingState {
    NotStarted,
    InProgress {
        started_at: DateTime<Utc>,
    },
    Ended {
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    },
}

impl RecordingState {
    fn name(&self) -> &'static str {
        match self {
            RecordingState::NotStarted => "not_started",
            RecordingState::InProgress { .. } => "in_progress",
            RecordingState::Ended { .. } => "ended",
        }
    }
}

/// Errors from session transitions and save validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordingError {
    #[error("Cannot {action} a recording that is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },

    #[error("Location provider is in use by another recording")]
    ProviderBusy,

    #[error("Recording has not ended")]
    NotEnded,

    #[error("Recording ends before it starts")]
    MalformedTimestamps,
}

/// One in-progress-to-ended recording.
pub struct RecordingSession {
    route_type: RouteType,
    state: RecordingState,
    path: Vec<LocationSample>,
    location: LocationGate,
    lease: Option<LocationLease>,
}

impl RecordingSession {
    pub fn new(location: LocationGate, route_type: RouteType) -> Self {
        Self {
            route_type,
            state: RecordingState::NotStarted,
            path: Vec::new(),
            location,
            lease: None,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn route_type(&self) -> RouteType {
        self.route_type
    }

    /// Change the activity type. Allowed in any state until the session is saved.
    pub fn set_route_type(&mut self, route_type: RouteType) {
        self.route_type = route_type;
    }

    /// Begin recording: acquire the provider and capture the start time.
    ///
    /// If the provider already has a fix it becomes the first sample.
    pub fn start(&mut self) -> Result<(), RecordingError> {
        if self.state != RecordingState::NotStarted {
            return Err(RecordingError::InvalidTransition {
                from: self.state.name(),
                action: "start",
            });
        }

        let lease = self.location.acquire()?;
        let initial = lease.current_position();
        self.lease = Some(lease);

        let started_at = Utc::now();
        self.state = RecordingState::InProgress { started_at };
        tracing::info!(route_type = %self.route_type, %started_at, "Recording started");

        if let Some(sample) = initial {
            self.add_sample(sample);
        }
        Ok(())
    }

    /// Stop recording: release the provider and capture the end time.
    ///
    /// An empty path is accepted.
    pub fn stop(&mut self) -> Result<(), RecordingError> {
        let RecordingState::InProgress { started_at } = self.state else {
            return Err(RecordingError::InvalidTransition {
                from: self.state.name(),
                action: "stop",
            });
        };

        self.lease = None;

        // Wall clock may step backwards; keep end >= start.
        let ended_at = Utc::now().max(started_at);
        self.state = RecordingState::Ended {
            started_at,
            ended_at,
        };
        tracing::info!(
            samples = self.path.len(),
            duration_secs = (ended_at - started_at).num_seconds(),
            "Recording stopped"
        );
        Ok(())
    }

    /// Discard the session without saving.
    pub fn cancel(self) {
        tracing::info!(
            state = self.state.name(),
            samples = self.path.len(),
            "Recording discarded"
        );
        // Dropping `self` releases the provider if still held.
    }

    /// Append a sample. Returns `false` if the session is not in progress.
    pub fn add_sample(&mut self, sample: LocationSample) -> bool {
        if !matches!(self.state, RecordingState::InProgress { .. }) {
            tracing::debug!(
                state = self.state.name(),
                "Dropping location sample outside of recording"
            );
            return false;
        }
        self.path.push(sample);
        true
    }

    /// Samples collected so far, in capture order.
    pub fn current_path(&self) -> &[LocationSample] {
        &self.path
    }

    /// Build the route to persist. Only valid once the session has ended.
    pub fn draft(&self) -> Result<NewRoute, RecordingError> {
        let RecordingState::Ended {
            started_at,
            ended_at,
        } = self.state
        else {
            return Err(RecordingError::NotEnded);
        };
        if ended_at < started_at {
            return Err(RecordingError::MalformedTimestamps);
        }

        Ok(NewRoute {
            route_type: self.route_type,
            path: self.path.clone(),
            started_at,
            ended_at,
        })
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: RecordingState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::location::{LocationProvider, ReportedLocation};
    use chrono::Duration;
    use std::sync::Arc;

    fn session() -> (RecordingSession, Arc<ReportedLocation>) {
        let provider = Arc::new(ReportedLocation::new());
        let gate = LocationGate::new(provider.clone());
        (RecordingSession::new(gate, RouteType::Run), provider)
    }

    #[test]
    fn test_samples_kept_in_arrival_order() {
        let (mut s, _) = session();
        s.start().unwrap();

        let samples: Vec<LocationSample> = (0..20)
            .map(|i| LocationSample::new(10.0 + i as f64 * 0.001, 20.0))
            .collect();
        for sample in &samples {
            assert!(s.add_sample(*sample));
        }

        assert_eq!(s.current_path(), samples.as_slice());
    }

    #[test]
    fn test_samples_outside_recording_are_dropped() {
        let (mut s, _) = session();
        assert!(!s.add_sample(LocationSample::new(1.0, 1.0)));

        s.start().unwrap();
        let kept = LocationSample::new(2.0, 2.0);
        s.add_sample(kept);
        s.stop().unwrap();

        assert!(!s.add_sample(LocationSample::new(3.0, 3.0)));
        assert_eq!(s.current_path(), &[kept]);
    }

    #[test]
    fn test_duplicates_are_not_collapsed() {
        let (mut s, _) = session();
        s.start().unwrap();
        let sample = LocationSample::new(5.0, 5.0);
        s.add_sample(sample);
        s.add_sample(sample);
        assert_eq!(s.current_path().len(), 2);
    }

    #[test]
    fn test_start_seeds_current_position() {
        let provider = Arc::new(ReportedLocation::new());
        let gate = LocationGate::new(provider.clone());
        let mut s = RecordingSession::new(gate, RouteType::Walk);

        // Provider already running with a fix (e.g. started by the device).
        provider.start();
        let fix = LocationSample::new(47.0, 8.0);
        provider.report(fix);

        s.start().unwrap();
        assert_eq!(s.current_path(), &[fix]);
    }

    #[test]
    fn test_stop_records_ordered_timestamps() {
        let (mut s, _) = session();
        s.start().unwrap();
        s.stop().unwrap();

        match s.state() {
            RecordingState::Ended {
                started_at,
                ended_at,
            } => assert!(ended_at >= started_at),
            other => panic!("unexpected state {other:?}"),
        }
        assert!(s.current_path().is_empty());
    }

    #[test]
    fn test_cannot_resume_after_end() {
        let (mut s, _) = session();
        s.start().unwrap();
        s.stop().unwrap();

        assert_eq!(
            s.start(),
            Err(RecordingError::InvalidTransition {
                from: "ended",
                action: "start"
            })
        );
        assert_eq!(
            s.stop(),
            Err(RecordingError::InvalidTransition {
                from: "ended",
                action: "stop"
            })
        );
    }

    #[test]
    fn test_stop_before_start_is_rejected() {
        let (mut s, _) = session();
        assert!(matches!(
            s.stop(),
            Err(RecordingError::InvalidTransition { from: "not_started", .. })
        ));
        assert_eq!(s.state(), RecordingState::NotStarted);
    }

    #[test]
    fn test_provider_released_on_stop_cancel_and_drop() {
        let (mut s, provider) = session();
        s.start().unwrap();
        assert!(provider.is_active());
        s.stop().unwrap();
        assert!(!provider.is_active());

        let (mut s, provider) = session();
        s.start().unwrap();
        s.cancel();
        assert!(!provider.is_active());

        let (mut s, provider) = session();
        s.start().unwrap();
        drop(s);
        assert!(!provider.is_active());
    }

    #[test]
    fn test_second_session_cannot_start_while_first_records() {
        let provider = Arc::new(ReportedLocation::new());
        let gate = LocationGate::new(provider);
        let mut first = RecordingSession::new(gate.clone(), RouteType::Run);
        let mut second = RecordingSession::new(gate, RouteType::Bike);

        first.start().unwrap();
        assert_eq!(second.start(), Err(RecordingError::ProviderBusy));
        assert_eq!(second.state(), RecordingState::NotStarted);

        first.stop().unwrap();
        assert!(second.start().is_ok());
    }

    #[test]
    fn test_draft_requires_ended_state() {
        let (mut s, _) = session();
        assert_eq!(s.draft(), Err(RecordingError::NotEnded));
        s.start().unwrap();
        assert_eq!(s.draft(), Err(RecordingError::NotEnded));
    }

    #[test]
    fn test_draft_rejects_reversed_timestamps() {
        let (mut s, _) = session();
        let now = Utc::now();
        s.force_state(RecordingState::Ended {
            started_at: now,
            ended_at: now - Duration::seconds(5),
        });
        assert_eq!(s.draft(), Err(RecordingError::MalformedTimestamps));
    }

    #[test]
    fn test_draft_uses_currently_selected_type() {
        let (mut s, _) = session();
        s.start().unwrap();
        s.add_sample(LocationSample::new(10.0, 20.0));
        s.stop().unwrap();
        s.set_route_type(RouteType::Hike);

        let draft = s.draft().unwrap();
        assert_eq!(draft.route_type, RouteType::Hike);
        assert_eq!(draft.path, s.current_path());
    }
}
