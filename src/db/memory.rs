// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! In-process route store.
//!
//! Used for local development and as the test double for the pipelines. It
//! keeps routes in insertion order, can be switched offline to simulate an
//! unreachable backend, and counts calls per operation.

use crate::db::{validate_new_route, RouteStore, StoreError};
use crate::models::{NewRoute, Route, RouteId};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Route store held in memory.
#[derive(Default)]
pub struct MemoryRouteStore {
    routes: RwLock<Vec<Route>>,
    offline: AtomicBool,
    create_calls: AtomicUsize,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backend becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Number of stored routes.
    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.routes.read().await.is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "Route store offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn create(&self, route: NewRoute) -> Result<Route, StoreError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        validate_new_route(&route)?;

        let route = route.with_id(RouteId::generate());
        self.routes.write().await.push(route.clone());

        tracing::debug!(route_id = %route.id, samples = route.path.len(), "Stored route in memory");
        Ok(route)
    }

    async fn list_all(&self) -> Result<Vec<Route>, StoreError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        Ok(self.routes.read().await.clone())
    }

    async fn delete(&self, id: &RouteId) -> Result<(), StoreError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        let mut routes = self.routes.write().await;
        let idx = routes
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        routes.remove(idx);

        tracing::debug!(route_id = %id, "Deleted route from memory");
        Ok(())
    }
}
