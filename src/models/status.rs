// SPDX-License-Identifier: MIT
// Copyright 2026 The Pathy Authors

//! Progress of an asynchronous pipeline call.

use serde::Serialize;

/// Status reported by the save and list pipelines.
///
/// Only pipeline operations move a status between states.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "payload", rename_all = "lowercase")]
pub enum LoadingStatus<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> LoadingStatus<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingStatus::Loading)
    }

    /// Error message, if the last call failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadingStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            LoadingStatus::Success(payload) => Some(payload),
            _ => None,
        }
    }

    /// Lowercase name of the current state.
    pub fn label(&self) -> &'static str {
        match self {
            LoadingStatus::Idle => "idle",
            LoadingStatus::Loading => "loading",
            LoadingStatus::Success(_) => "success",
            LoadingStatus::Error(_) => "error",
        }
    }

    pub fn map<U>(&self, f: impl FnOnce(&T) -> U) -> LoadingStatus<U> {
        match self {
            LoadingStatus::Idle => LoadingStatus::Idle,
            LoadingStatus::Loading => LoadingStatus::Loading,
            LoadingStatus::Success(payload) => LoadingStatus::Success(f(payload)),
            LoadingStatus::Error(msg) => LoadingStatus::Error(msg.clone()),
        }
    }
}
