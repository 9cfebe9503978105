// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Recording session API.
//!
//! At most one session is open at a time; it is held in [`AppState::session`].
//! While a save runs the slot keeps a snapshot of the session, so the server
//! still reports it and refuses to open, change or cancel another one.

use crate::error::{AppError, Result};
use crate::models::route::path_distance_meters;
use crate::models::{LocationSample, RouteType};
use crate::routes::api::RouteSummary;
use crate::services::save::save_in_progress;
use crate::services::{RecordingSession, RecordingState, SaveFailure};
use crate::AppState;
use axum::{
    extract::State,
    routing::{post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/session",
            post(open_session).get(get_session).delete(cancel_session),
        )
        .route("/api/session/type", put(set_route_type))
        .route("/api/session/start", post(start_session))
        .route("/api/session/stop", post(stop_session))
        .route("/api/session/location", post(report_location))
        .route("/api/session/save", post(save_session))
}

fn no_session() -> AppError {
    AppError::NotFound("No recording session is open".to_string())
}

fn session_saving() -> AppError {
    AppError::Conflict("The recording session is being saved".to_string())
}

/// Snapshot of the open session.
#[derive(Serialize, Clone, Debug)]
pub struct SessionResponse {
    pub state: RecordingState,
    pub route_type: RouteType,
    pub icon: String,
    pub path: Vec<LocationSample>,
    pub distance_meters: f64,
}

impl From<&RecordingSession> for SessionResponse {
    fn from(session: &RecordingSession) -> Self {
        let path = session.current_path();
        Self {
            state: session.state(),
            route_type: session.route_type(),
            icon: session.route_type().system_image_name().to_string(),
            path: path.to_vec(),
            distance_meters: path_distance_meters(path),
        }
    }
}

/// What the server holds for the recording session.
#[derive(Default)]
pub enum SessionSlot {
    #[default]
    Empty,
    Open(RecordingSession),
    /// Handed to the save pipeline; restored as `Open` if the save fails
    Saving(SessionResponse),
}

impl SessionSlot {
    pub fn snapshot(&self) -> Option<SessionResponse> {
        match self {
            SessionSlot::Empty => None,
            SessionSlot::Open(session) => Some(SessionResponse::from(session)),
            SessionSlot::Saving(snapshot) => Some(snapshot.clone()),
        }
    }

    /// The open session, for handlers that change it.
    fn open_mut(&mut self) -> Result<&mut RecordingSession> {
        match self {
            SessionSlot::Empty => Err(no_session()),
            SessionSlot::Open(session) => Ok(session),
            SessionSlot::Saving(_) => Err(session_saving()),
        }
    }
}

// ─── Lifecycle ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
struct OpenSessionRequest {
    #[serde(default)]
    route_type: RouteType,
}

/// Open a new recording session. The body is optional.
async fn open_session(
    State(state): State<Arc<AppState>>,
    req: Option<Json<OpenSessionRequest>>,
) -> Result<Json<SessionResponse>> {
    let req = req.map(|Json(req)| req).unwrap_or_default();

    let mut slot = state.session.lock().await;
    match *slot {
        SessionSlot::Empty => {}
        SessionSlot::Open(_) => {
            return Err(AppError::Conflict(
                "A recording session is already open".to_string(),
            ))
        }
        SessionSlot::Saving(_) => return Err(session_saving()),
    }

    let session = RecordingSession::new(state.location_gate.clone(), req.route_type);
    let response = SessionResponse::from(&session);
    *slot = SessionSlot::Open(session);

    tracing::info!(route_type = %req.route_type, "Recording session opened");
    Ok(Json(response))
}

async fn get_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let slot = state.session.lock().await;
    slot.snapshot().map(Json).ok_or_else(no_session)
}

/// Close the session without saving. Releases the location provider.
async fn cancel_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let mut slot = state.session.lock().await;
    slot.open_mut()?;
    let SessionSlot::Open(session) = std::mem::take(&mut *slot) else {
        return Err(no_session());
    };
    let response = SessionResponse::from(&session);
    session.cancel();
    Ok(Json(response))
}

#[derive(Deserialize)]
struct RouteTypeRequest {
    route_type: RouteType,
}

async fn set_route_type(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RouteTypeRequest>,
) -> Result<Json<SessionResponse>> {
    let mut slot = state.session.lock().await;
    let session = slot.open_mut()?;
    session.set_route_type(req.route_type);
    Ok(Json(SessionResponse::from(&*session)))
}

async fn start_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let mut slot = state.session.lock().await;
    let session = slot.open_mut()?;
    session.start()?;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn stop_session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let mut slot = state.session.lock().await;
    let session = slot.open_mut()?;
    session.stop()?;
    Ok(Json(SessionResponse::from(&*session)))
}

// ─── Location Reports ────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct LocationReport {
    #[validate(range(min = -90.0, max = 90.0))]
    latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    longitude: f64,
    /// Device capture time; defaults to receipt time
    recorded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct LocationReportResponse {
    /// Whether the sample was appended to the open recording
    pub recorded: bool,
    pub path_len: usize,
}

/// Position report from the device's location source.
async fn report_location(
    State(state): State<Arc<AppState>>,
    Json(report): Json<LocationReport>,
) -> Result<Json<LocationReportResponse>> {
    report
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let sample = LocationSample::at(
        report.latitude,
        report.longitude,
        report.recorded_at.unwrap_or_else(Utc::now),
    );

    let mut slot = state.session.lock().await;
    let published = state.location.report(sample);

    let (recorded, path_len) = match &mut *slot {
        SessionSlot::Open(session) => {
            let recorded = match published {
                Some(sample) => session.add_sample(sample),
                None => false,
            };
            (recorded, session.current_path().len())
        }
        SessionSlot::Saving(snapshot) => (false, snapshot.path.len()),
        SessionSlot::Empty => (false, 0),
    };

    Ok(Json(LocationReportResponse { recorded, path_len }))
}

// ─── Save ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SaveResponse {
    pub route: RouteSummary,
}

/// Save the ended session. On failure the session stays open for retry.
async fn save_session(State(state): State<Arc<AppState>>) -> Result<Json<SaveResponse>> {
    let session = {
        let mut slot = state.session.lock().await;
        match std::mem::take(&mut *slot) {
            SessionSlot::Empty => return Err(no_session()),
            SessionSlot::Saving(snapshot) => {
                *slot = SessionSlot::Saving(snapshot);
                return Err(save_in_progress());
            }
            SessionSlot::Open(session) => {
                *slot = SessionSlot::Saving(SessionResponse::from(&session));
                session
            }
        }
    };

    // Settle the slot in its own task so a dropped request cannot strand it
    // in `Saving`.
    let task_state = state.clone();
    let outcome = tokio::spawn(async move {
        let result = task_state.save_pipeline.save(session).await;
        let mut slot = task_state.session.lock().await;
        match result {
            Ok(route) => {
                *slot = SessionSlot::Empty;
                Ok(route)
            }
            Err(SaveFailure { session, error }) => {
                *slot = SessionSlot::Open(session);
                Err(error)
            }
        }
    })
    .await
    .map_err(anyhow::Error::from)?;

    let route = outcome?;
    Ok(Json(SaveResponse {
        route: RouteSummary::from(&route),
    }))
}
