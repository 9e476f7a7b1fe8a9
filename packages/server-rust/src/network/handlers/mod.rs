//! HTTP handler definitions for the movies server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod error;
pub mod health;
pub mod movies;

pub use error::ApiError;
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use movies::{
    create_movie, delete_movie, get_movie, list_movies, preflight_handler, root_handler,
    update_movie, MovieQuery,
};

use std::sync::Arc;
use std::time::Instant;

use super::{NetworkConfig, OriginGate, ShutdownController};
use crate::storage::MovieStore;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The movie collection. Injected, never global.
    pub store: Arc<dyn MovieStore>,
    /// CORS allow-list decisions.
    pub gate: Arc<OriginGate>,
    /// Health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration (bind address, origins, timeouts).
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Builds state around `store` with the gate derived from `config`.
    #[must_use]
    pub fn new(store: Arc<dyn MovieStore>, config: NetworkConfig) -> Self {
        Self {
            store,
            gate: Arc::new(OriginGate::new(&config.cors_origins)),
            shutdown: Arc::new(ShutdownController::new()),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }
}
