// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! A single position observation.

use chrono::{DateTime, Utc};
use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// One captured position during a recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    /// Latitude in degrees (WGS84)
    pub latitude: f64,
    /// Longitude in degrees (WGS84)
    pub longitude: f64,
    /// When the position was captured
    pub recorded_at: DateTime<Utc>,
}

impl LocationSample {
    /// Create a sample captured now.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::at(latitude, longitude, Utc::now())
    }

    /// Create a sample with an explicit capture time.
    pub fn at(latitude: f64, longitude: f64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            recorded_at,
        }
    }

    /// Whether the coordinates are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<LocationSample> for Coord<f64> {
    fn from(sample: LocationSample) -> Self {
        Coord {
            x: sample.longitude,
            y: sample.latitude,
        }
    }
}

impl From<LocationSample> for Point<f64> {
    fn from(sample: LocationSample) -> Self {
        Point::new(sample.longitude, sample.latitude)
    }
}
