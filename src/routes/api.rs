// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Saved-route browsing API.

use crate::error::Result;
use crate::models::{LoadingStatus, Route, RouteId, RouteType};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/route-types", get(get_route_types))
        .route("/api/routes", get(get_routes))
        .route("/api/routes/{id}", delete(delete_route))
        .route("/api/status", get(get_status))
}

// ─── Route Types ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteTypeInfo {
    pub route_type: RouteType,
    pub label: String,
    pub icon: String,
}

async fn get_route_types() -> Json<Vec<RouteTypeInfo>> {
    Json(
        RouteType::ALL
            .into_iter()
            .map(|t| RouteTypeInfo {
                route_type: t,
                label: t.label().to_string(),
                icon: t.system_image_name().to_string(),
            })
            .collect(),
    )
}

// ─── Routes ──────────────────────────────────────────────────

/// Route as shown in lists.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RouteSummary {
    pub id: String,
    pub route_type: RouteType,
    pub icon: String,
    pub started_at: String,
    pub ended_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration_secs: i64,
    pub distance_meters: f64,
    pub sample_count: usize,
    /// Encoded polyline (precision 5)
    pub polyline: Option<String>,
}

impl From<&Route> for RouteSummary {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.to_string(),
            route_type: route.route_type,
            icon: route.route_type.system_image_name().to_string(),
            started_at: format_utc_rfc3339(route.started_at),
            ended_at: format_utc_rfc3339(route.ended_at),
            duration_secs: route.duration().num_seconds(),
            distance_meters: route.distance_meters(),
            sample_count: route.path.len(),
            polyline: route.encoded_path(),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RoutesResponse {
    pub routes: Vec<RouteSummary>,
}

/// Fetch every saved route.
async fn get_routes(State(state): State<Arc<AppState>>) -> Result<Json<RoutesResponse>> {
    let routes = state.list_pipeline.fetch_all().await?;
    Ok(Json(RoutesResponse {
        routes: routes.iter().map(RouteSummary::from).collect(),
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteRouteResponse {
    pub success: bool,
    pub id: String,
}

/// Delete a saved route.
async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteRouteResponse>> {
    let id = RouteId(id);
    tracing::info!(route_id = %id, "User-initiated route deletion");

    state.list_pipeline.delete_by_id(&id).await?;
    state.list_pipeline.forget(&id);

    Ok(Json(DeleteRouteResponse {
        success: true,
        id: id.to_string(),
    }))
}

// ─── Pipeline Status ─────────────────────────────────────────

#[derive(Serialize)]
pub struct StatusResponse {
    pub list: LoadingStatus<Vec<RouteSummary>>,
    pub save: LoadingStatus<RouteSummary>,
}

/// Current status of both pipelines.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let list = state
        .list_pipeline
        .status()
        .map(|routes| routes.iter().map(RouteSummary::from).collect());
    let save = state.save_pipeline.status().map(|route| RouteSummary::from(route));
    Json(StatusResponse { list, save })
}
