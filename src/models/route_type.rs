// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Activity categories a route can be recorded as.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of activity a route was recorded for.
///
/// The lowercase token is the storage representation. Renaming a token breaks
/// every route already persisted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum RouteType {
    #[default]
    Run,
    Walk,
    Hike,
    Bike,
    Other,
}

impl RouteType {
    /// Every variant, in picker order.
    pub const ALL: [RouteType; 5] = [
        RouteType::Run,
        RouteType::Walk,
        RouteType::Hike,
        RouteType::Bike,
        RouteType::Other,
    ];

    /// Stable serialization token.
    pub fn as_str(self) -> &'static str {
        match self {
            RouteType::Run => "run",
            RouteType::Walk => "walk",
            RouteType::Hike => "hike",
            RouteType::Bike => "bike",
            RouteType::Other => "other",
        }
    }

    /// Human-readable label ("Run", "Walk", ...).
    pub fn label(self) -> &'static str {
        match self {
            RouteType::Run => "Run",
            RouteType::Walk => "Walk",
            RouteType::Hike => "Hike",
            RouteType::Bike => "Bike",
            RouteType::Other => "Other",
        }
    }

    /// Icon identifier clients use to draw the type.
    pub fn system_image_name(self) -> &'static str {
        match self {
            RouteType::Run => "figure.run",
            RouteType::Walk => "figure.walk",
            RouteType::Hike => "figure.hiking",
            RouteType::Bike => "bicycle",
            RouteType::Other => "point.topleft.down.curvedto.point.bottomright.up",
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown route type token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown route type: {0}")]
pub struct UnknownRouteType(pub String);

impl FromStr for RouteType {
    type Err = UnknownRouteType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownRouteType(s.to_string()))
    }
}
