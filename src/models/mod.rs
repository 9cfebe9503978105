// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Data models for the application.

pub mod location;
pub mod route;
pub mod route_type;
pub mod status;

pub use location::LocationSample;
pub use route::{NewRoute, Route, RouteId};
pub use route_type::RouteType;
pub use status::LoadingStatus;
