// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Fetching and deleting saved routes.

use crate::db::RouteStore;
use crate::error::Result;
use crate::models::{LoadingStatus, Route, RouteId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// List pipeline with an observable status.
///
/// Overlapping fetches are sequenced by request number: only the most
/// recently started fetch may publish its result.
#[derive(Clone)]
pub struct ListPipeline {
    store: Arc<dyn RouteStore>,
    status: Arc<watch::Sender<LoadingStatus<Vec<Route>>>>,
    latest_request: Arc<AtomicU64>,
}

impl ListPipeline {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        let (status, _) = watch::channel(LoadingStatus::Idle);
        Self {
            store,
            status: Arc::new(status),
            latest_request: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn status(&self) -> LoadingStatus<Vec<Route>> {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingStatus<Vec<Route>>> {
        self.status.subscribe()
    }

    /// Fetch every stored route, in the store's order.
    pub async fn fetch_all(&self) -> Result<Vec<Route>> {
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        self.status.send_replace(LoadingStatus::Loading);

        let result = self.store.list_all().await;

        let published = self.status.send_if_modified(|status| {
            if self.latest_request.load(Ordering::SeqCst) != request {
                return false;
            }
            *status = match &result {
                Ok(routes) => LoadingStatus::Success(routes.clone()),
                Err(e) => LoadingStatus::Error(e.to_string()),
            };
            true
        });

        match &result {
            Ok(routes) => tracing::debug!(count = routes.len(), request, published, "Fetched routes"),
            Err(e) => tracing::error!(error = %e, request, published, "Failed to fetch routes"),
        }

        Ok(result?)
    }

    /// Delete a previously fetched route.
    pub async fn delete(&self, route: &Route) -> Result<()> {
        self.delete_by_id(&route.id).await
    }

    /// Delete a route by id.
    ///
    /// The visible list is left alone; re-fetch or call [`forget`](Self::forget).
    pub async fn delete_by_id(&self, id: &RouteId) -> Result<()> {
        match self.store.delete(id).await {
            Ok(()) => {
                tracing::info!(route_id = %id, "Route deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(route_id = %id, error = %e, "Failed to delete route");
                self.status.send_replace(LoadingStatus::Error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Drop a route from the last successful result without re-fetching.
    pub fn forget(&self, id: &RouteId) {
        self.status.send_if_modified(|status| match status {
            LoadingStatus::Success(routes) => {
                let before = routes.len();
                routes.retain(|r| &r.id != id);
                routes.len() != before
            }
            _ => false,
        });
    }
}
