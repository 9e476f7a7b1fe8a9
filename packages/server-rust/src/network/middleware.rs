//! HTTP middleware for the movies server.
//!
//! Two groups:
//! - transport layers from `tower-http` ([`build_http_layers`]), applied
//!   outermost;
//! - application middleware ([`admit_request`], [`apply_origin_gate`])
//!   that needs [`AppState`].

use axum::extract::{Request, State};
use axum::http::header::{HeaderName, ORIGIN};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::config::NetworkConfig;
use super::handlers::AppState;

/// The composed Tower layer type produced by [`build_http_layers`].
///
/// Each layer wraps the next in a `Stack`, from outermost (first applied)
/// to innermost (last applied).
type HttpLayers = tower::layer::util::Stack<
    PropagateRequestIdLayer,
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            CompressionLayer,
            tower::layer::util::Stack<
                TraceLayer<
                    tower_http::classify::SharedClassifier<
                        tower_http::classify::ServerErrorsAsFailures,
                    >,
                >,
                tower::layer::util::Stack<
                    SetRequestIdLayer<MakeRequestUuid>,
                    tower::layer::util::Identity,
                >,
            >,
        >,
    >,
>;

/// Builds the transport-level Tower middleware stack.
///
/// **Ordering (outermost to innermost):**
/// 1. `SetRequestId` -- assigns a UUID v4 `X-Request-Id` to every request
/// 2. `Tracing` -- request/response trace spans
/// 3. `Compression` -- gzip when the client accepts it
/// 4. `Timeout` -- answers 408 once `request_timeout` elapses
/// 5. `PropagateRequestId` -- copies `X-Request-Id` onto the response
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static("x-request-id");

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

/// Path prefix of the probe endpoints, which keep answering while draining.
const HEALTH_PREFIX: &str = "/health";

/// Holds a request permit for the lifetime of each request so shutdown can
/// wait for it.
///
/// Once draining, movie routes answer 503 instead of starting new work.
/// Health probes are always served so orchestrators can watch the drain.
pub async fn admit_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let permit = if request.uri().path().starts_with(HEALTH_PREFIX) {
        Some(state.shutdown.track())
    } else {
        state.shutdown.admit()
    };

    let Some(_permit) = permit else {
        info!(path = %request.uri().path(), "refusing request while shutting down");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Server is shutting down" })),
        )
            .into_response();
    };
    next.run(request).await
}

/// Attaches the origin gate's CORS headers to every response.
pub async fn apply_origin_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let decision = state.gate.decide(request.headers().get(ORIGIN));
    if !decision.is_allowed() {
        debug!(
            origin = ?request.headers().get(ORIGIN),
            "origin not in allow-list, omitting CORS headers"
        );
    }

    let mut response = next.run(request).await;
    decision.apply(response.headers_mut());
    response
}
