// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Persisted route record.

use crate::models::{LocationSample, RouteType};
use chrono::{DateTime, Duration, Utc};
use geo::{Coord, Distance, Haversine, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polyline precision used for encoded paths.
const POLYLINE_PRECISION: u32 = 5;

/// Store-assigned route identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

impl RouteId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A finished recording that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRoute {
    pub route_type: RouteType,
    pub path: Vec<LocationSample>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl NewRoute {
    /// Attach the identifier the store assigned.
    pub fn with_id(self, id: RouteId) -> Route {
        Route {
            id,
            route_type: self.route_type,
            path: self.path,
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }
}

/// A saved route. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Store-assigned identifier (also used as document ID)
    pub id: RouteId,
    pub route_type: RouteType,
    /// Samples in capture order
    pub path: Vec<LocationSample>,
    pub started_at: DateTime<Utc>,
    /// Always >= `started_at`
    pub ended_at: DateTime<Utc>,
}

impl Route {
    /// Elapsed time between start and stop.
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    /// Great-circle length of the path in meters.
    pub fn distance_meters(&self) -> f64 {
        path_distance_meters(&self.path)
    }

    /// Path encoded as a Google polyline, or `None` if a sample is out of range.
    pub fn encoded_path(&self) -> Option<String> {
        let coords = self.path.iter().map(|s| Coord::<f64>::from(*s));
        polyline::encode_coordinates(coords, POLYLINE_PRECISION).ok()
    }
}

/// Sum of haversine distances between consecutive samples.
pub fn path_distance_meters(path: &[LocationSample]) -> f64 {
    path.windows(2)
        .map(|pair| {
            let a: Point<f64> = pair[0].into();
            let b: Point<f64> = pair[1].into();
            Haversine.distance(a, b)
        })
        .fold(0.0, |total, d| total + d)
}
