// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Turns an ended recording into a stored route.

use crate::db::RouteStore;
use crate::error::AppError;
use crate::models::{LoadingStatus, Route};
use crate::services::recording::RecordingSession;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A failed save. The session is handed back so it can be retried.
pub struct SaveFailure {
    pub session: RecordingSession,
    pub error: AppError,
}

impl fmt::Debug for SaveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveFailure")
            .field("state", &self.session.state())
            .field("error", &self.error)
            .finish()
    }
}

/// Error returned when a save is requested while another one is running.
pub fn save_in_progress() -> AppError {
    AppError::Conflict("A save is already in progress".to_string())
}

/// Save pipeline with an observable status.
#[derive(Clone)]
pub struct SavePipeline {
    store: Arc<dyn RouteStore>,
    status: Arc<watch::Sender<LoadingStatus<Route>>>,
}

impl SavePipeline {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        let (status, _) = watch::channel(LoadingStatus::Idle);
        Self {
            store,
            status: Arc::new(status),
        }
    }

    pub fn status(&self) -> LoadingStatus<Route> {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LoadingStatus<Route>> {
        self.status.subscribe()
    }

    /// Persist an ended session.
    ///
    /// On success the session is consumed. On failure it comes back inside
    /// [`SaveFailure`] untouched. A call made while another save is loading
    /// is rejected without touching the status or the store.
    pub async fn save(&self, session: RecordingSession) -> Result<Route, SaveFailure> {
        let draft = session.draft();

        let mut busy = false;
        self.status.send_if_modified(|status| {
            if status.is_loading() {
                busy = true;
                return false;
            }
            *status = match &draft {
                Ok(_) => LoadingStatus::Loading,
                Err(e) => LoadingStatus::Error(e.to_string()),
            };
            true
        });

        if busy {
            tracing::warn!("Save requested while another save is in flight");
            return Err(SaveFailure {
                session,
                error: save_in_progress(),
            });
        }

        let draft = match draft {
            Ok(draft) => draft,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected save of unfinished recording");
                return Err(SaveFailure {
                    session,
                    error: e.into(),
                });
            }
        };

        tracing::info!(
            route_type = %draft.route_type,
            samples = draft.path.len(),
            "Saving route"
        );

        match self.store.create(draft).await {
            Ok(route) => {
                tracing::info!(route_id = %route.id, "Route saved");
                self.status.send_replace(LoadingStatus::Success(route.clone()));
                Ok(route)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save route");
                self.status.send_replace(LoadingStatus::Error(e.to_string()));
                Err(SaveFailure {
                    session,
                    error: e.into(),
                })
            }
        }
    }

    /// Run [`save`](Self::save) as an independent task.
    pub fn spawn(&self, session: RecordingSession) -> JoinHandle<Result<Route, SaveFailure>> {
        let pipeline = self.clone();
        tokio::spawn(async move { pipeline.save(session).await })
    }
}
