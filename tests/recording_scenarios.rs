// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! End-to-end recording scenarios against the library API.

use pathy::db::{MemoryRouteStore, RouteStore};
use pathy::error::AppError;
use pathy::models::{LoadingStatus, LocationSample, RouteId, RouteType};
use pathy::services::{
    ListPipeline, LocationGate, LocationProvider, RecordingSession, ReportedLocation, SavePipeline,
};
use std::sync::Arc;

struct Harness {
    provider: Arc<ReportedLocation>,
    gate: LocationGate,
    store: Arc<MemoryRouteStore>,
    save: SavePipeline,
    list: ListPipeline,
}

fn harness() -> Harness {
    let provider = Arc::new(ReportedLocation::new());
    let gate = LocationGate::new(provider.clone());
    let store = Arc::new(MemoryRouteStore::new());
    Harness {
        provider,
        gate,
        save: SavePipeline::new(store.clone()),
        list: ListPipeline::new(store.clone()),
        store,
    }
}

/// Feed a position through the provider into the session, as the server does.
fn deliver(h: &Harness, session: &mut RecordingSession, lat: f64, lon: f64) -> bool {
    match h.provider.report(LocationSample::new(lat, lon)) {
        Some(sample) => session.add_sample(sample),
        None => false,
    }
}

#[tokio::test]
async fn test_record_and_save_run() {
    let h = harness();
    let mut session = RecordingSession::new(h.gate.clone(), RouteType::Run);

    session.start().unwrap();
    assert!(deliver(&h, &mut session, 10.0, 20.0));
    assert!(deliver(&h, &mut session, 10.001, 20.001));
    session.stop().unwrap();

    let route = h.save.save(session).await.unwrap();

    assert_eq!(route.route_type, RouteType::Run);
    let coords: Vec<(f64, f64)> = route
        .path
        .iter()
        .map(|s| (s.latitude, s.longitude))
        .collect();
    assert_eq!(coords, vec![(10.0, 20.0), (10.001, 20.001)]);
    assert!(route.started_at <= route.ended_at);
    assert!(route.distance_meters() > 100.0);
    assert!(!h.provider.is_active());
}

#[tokio::test]
async fn test_reports_before_start_and_after_stop_are_excluded() {
    let h = harness();
    let mut session = RecordingSession::new(h.gate.clone(), RouteType::Walk);

    assert!(!deliver(&h, &mut session, 1.0, 1.0));
    session.start().unwrap();
    assert!(deliver(&h, &mut session, 2.0, 2.0));
    session.stop().unwrap();
    assert!(!deliver(&h, &mut session, 3.0, 3.0));
    // A late sample that bypasses the provider is dropped as well.
    assert!(!session.add_sample(LocationSample::new(4.0, 4.0)));

    let route = h.save.save(session).await.unwrap();
    assert_eq!(route.path.len(), 1);
    assert_eq!(route.path[0].latitude, 2.0);
}

#[tokio::test]
async fn test_stop_without_any_position_saves_empty_path() {
    let h = harness();
    let mut session = RecordingSession::new(h.gate.clone(), RouteType::Other);
    session.start().unwrap();
    session.stop().unwrap();

    let route = h.save.save(session).await.unwrap();
    assert!(route.path.is_empty());
    assert_eq!(route.distance_meters(), 0.0);
}

#[tokio::test]
async fn test_save_fresh_session_is_rejected() {
    let h = harness();
    let session = RecordingSession::new(h.gate.clone(), RouteType::Run);

    let failure = h.save.save(session).await.unwrap_err();

    assert!(matches!(failure.error, AppError::Recording(_)));
    assert!(matches!(h.save.status(), LoadingStatus::Error(_)));
    assert_eq!(h.store.create_calls(), 0);
    assert!(h.store.is_empty().await);
}

#[tokio::test]
async fn test_fetch_then_delete_then_fetch() {
    let h = harness();
    assert!(h.list.fetch_all().await.unwrap().is_empty());
    assert_eq!(h.list.status(), LoadingStatus::Success(vec![]));

    for route_type in [RouteType::Hike, RouteType::Bike] {
        let mut session = RecordingSession::new(h.gate.clone(), route_type);
        session.start().unwrap();
        deliver(&h, &mut session, 46.5, 7.9);
        session.stop().unwrap();
        h.save.spawn(session).await.unwrap().unwrap();
    }

    let routes = h.list.fetch_all().await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].route_type, RouteType::Hike);

    h.list.delete(&routes[0]).await.unwrap();
    let remaining = h.list.fetch_all().await.unwrap();
    assert!(remaining.iter().all(|r| r.id != routes[0].id));
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn test_delete_absent_id_keeps_store_unchanged() {
    let h = harness();
    let mut session = RecordingSession::new(h.gate.clone(), RouteType::Run);
    session.start().unwrap();
    session.stop().unwrap();
    h.save.save(session).await.unwrap();

    assert!(h.list.delete_by_id(&RouteId::from("absent")).await.is_err());
    assert!(matches!(h.list.status(), LoadingStatus::Error(_)));
    assert_eq!(h.store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_releases_provider_for_next_session() {
    let h = harness();
    let mut first = RecordingSession::new(h.gate.clone(), RouteType::Run);
    first.start().unwrap();
    deliver(&h, &mut first, 1.0, 1.0);
    first.cancel();

    assert!(!h.gate.is_held());
    assert!(h.provider.current_position().is_none());

    let mut second = RecordingSession::new(h.gate.clone(), RouteType::Walk);
    second.start().unwrap();
    assert!(second.current_path().is_empty());
    assert_eq!(h.store.create_calls(), 0);
}
