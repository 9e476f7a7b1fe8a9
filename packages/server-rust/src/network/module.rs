//! Network module with deferred startup lifecycle.
//!
//! `new()` assembles shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until the shutdown future resolves.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    create_movie, delete_movie, get_movie, health_handler, list_movies, liveness_handler,
    preflight_handler, readiness_handler, root_handler, update_movie, AppState,
};
use super::middleware::{admit_request, apply_origin_gate, build_http_layers};
use super::shutdown::ShutdownController;
use crate::storage::MovieStore;

/// How long `serve()` waits for in-flight requests after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Assembles the axum router with all routes and middleware.
///
/// Routes:
/// - `GET /` -- greeting
/// - `GET /health`, `GET /health/live`, `GET /health/ready` -- probes
/// - `GET|POST|OPTIONS /movies`
/// - `GET|PATCH|DELETE|OPTIONS /movies/{id}`
///
/// Layering, outermost first: transport layers, request admission, origin
/// gate, then the handler.
pub fn build_router(state: AppState) -> Router {
    let layers = build_http_layers(&state.config);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .route(
            "/movies",
            get(list_movies).post(create_movie).options(preflight_handler),
        )
        .route(
            "/movies/{id}",
            get(get_movie)
                .patch(update_movie)
                .delete(delete_movie)
                .options(preflight_handler),
        )
        .layer(from_fn_with_state(state.clone(), apply_origin_gate))
        .layer(from_fn_with_state(state.clone(), admit_request))
        .layer(layers)
        .with_state(state)
}

/// Manages the HTTP server lifecycle.
///
/// 1. `new()` -- builds [`AppState`] around the injected store
/// 2. `start()` -- binds the TCP listener
/// 3. `serve()` -- serves until the shutdown future resolves, then drains
pub struct NetworkModule {
    state: AppState,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates the module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, store: Arc<dyn MovieStore>) -> Self {
        Self {
            state: AppState::new(store, config),
            listener: None,
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    /// Builds the router over this module's state.
    #[must_use]
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which differs from the configured one
    /// when port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let config = &self.state.config;
        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then waits for in-flight
    /// requests to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server hits
    /// a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };
        let shutdown_ctrl = Arc::clone(&self.state.shutdown);
        let router = build_router(self.state);

        shutdown_ctrl.set_ready();
        info!("Serving HTTP connections");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        shutdown_ctrl.trigger_shutdown();
        if shutdown_ctrl.wait_for_drain(DRAIN_TIMEOUT).await {
            info!("All in-flight requests drained");
        } else {
            warn!("Drain timeout expired with in-flight requests remaining");
        }
        Ok(())
    }
}
