// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Route persistence: the store contract and its backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryRouteStore;

use crate::models::{NewRoute, Route, RouteId};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const ROUTES: &str = "routes";
}

/// Errors reported by a route store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Route not found: {0}")]
    NotFound(RouteId),

    #[error("Route store unavailable: {0}")]
    Unavailable(String),

    #[error("Route rejected by store: {0}")]
    Rejected(String),
}

/// Durable collection of routes.
///
/// Implementations must tolerate concurrent independent calls.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Persist a new route and return it with its assigned identifier.
    async fn create(&self, route: NewRoute) -> Result<Route, StoreError>;

    /// All stored routes, in the store's natural order.
    async fn list_all(&self) -> Result<Vec<Route>, StoreError>;

    /// Remove a route. Fails with `NotFound` if the id is unknown.
    async fn delete(&self, id: &RouteId) -> Result<(), StoreError>;
}

/// Checks shared by every backend before a write.
pub(crate) fn validate_new_route(route: &NewRoute) -> Result<(), StoreError> {
    if route.ended_at < route.started_at {
        return Err(StoreError::Rejected(
            "ended_at is before started_at".to_string(),
        ));
    }
    if let Some(idx) = route.path.iter().position(|s| !s.is_valid()) {
        return Err(StoreError::Rejected(format!(
            "sample {} has out-of-range coordinates",
            idx
        )));
    }
    Ok(())
}
