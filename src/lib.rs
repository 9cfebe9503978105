// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Pathy: record, save and browse activity routes.
//!
//! This crate provides the route recording state machine, the save and list
//! pipelines against a route store, and a small JSON API hosting them.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::RouteStore;
use routes::session::SessionSlot;
use services::{ListPipeline, LocationGate, ReportedLocation, SavePipeline};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Device-fed location provider
    pub location: Arc<ReportedLocation>,
    /// Exclusive access to `location` for recording sessions
    pub location_gate: LocationGate,
    /// The open recording, if any
    pub session: Mutex<SessionSlot>,
    pub save_pipeline: SavePipeline,
    pub list_pipeline: ListPipeline,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RouteStore>) -> Self {
        let location = Arc::new(ReportedLocation::new());
        let location_gate = LocationGate::new(location.clone());
        Self {
            config,
            save_pipeline: SavePipeline::new(store.clone()),
            list_pipeline: ListPipeline::new(store),
            location,
            location_gate,
            session: Mutex::new(SessionSlot::Empty),
        }
    }
}
