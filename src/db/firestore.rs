// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Firestore-backed route store.
//!
//! Routes live in the `routes` collection, one document per route, keyed by
//! the route id.

use crate::db::{collections, validate_new_route, RouteStore, StoreError};
use crate::models::{NewRoute, Route, RouteId};
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Unavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All store operations will return `StoreError::Unavailable`.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or_else(|| {
            StoreError::Unavailable("Database not connected (offline mode)".to_string())
        })
    }

    /// Get a single route by id.
    pub async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ROUTES)
            .obj()
            .one(id.as_str())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl RouteStore for FirestoreDb {
    async fn create(&self, route: NewRoute) -> Result<Route, StoreError> {
        validate_new_route(&route)?;
        let route = route.with_id(RouteId::generate());

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ROUTES)
            .document_id(route.id.as_str())
            .object(&route)
            .execute()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(
            route_id = %route.id,
            route_type = %route.route_type,
            samples = route.path.len(),
            "Route stored in Firestore"
        );
        Ok(route)
    }

    async fn list_all(&self) -> Result<Vec<Route>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ROUTES)
            .order_by([("started_at", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, id: &RouteId) -> Result<(), StoreError> {
        // Firestore deletes of missing documents succeed silently.
        if self.get_route(id).await?.is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ROUTES)
            .document_id(id.as_str())
            .execute()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tracing::info!(route_id = %id, "Route deleted from Firestore");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocationSample, RouteType};
    use chrono::Utc;

    #[tokio::test]
    async fn test_offline_client_reports_unavailable() {
        let db = FirestoreDb::new_mock();
        let now = Utc::now();
        let route = NewRoute {
            route_type: RouteType::Bike,
            path: vec![LocationSample::new(10.0, 20.0)],
            started_at: now,
            ended_at: now,
        };

        assert!(matches!(
            db.create(route).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(db.list_all().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            db.delete(&RouteId::from("x")).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
