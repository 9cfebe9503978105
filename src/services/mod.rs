// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Services module - recording and route lifecycle logic.

pub mod list;
pub mod location;
pub mod recording;
pub mod save;

pub use list::ListPipeline;
pub use location::{LocationGate, LocationLease, LocationProvider, ReportedLocation};
pub use recording::{RecordingError, RecordingSession, RecordingState};
pub use save::{SaveFailure, SavePipeline};
