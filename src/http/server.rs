//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum app with a single fallback handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Buffer request bodies and hand each request to the route table
//! - Shut down gracefully on the lifecycle signal

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::exchange::Exchange;
use crate::observability::metrics;
use crate::routing::{RouteRequest, Router};

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router<Exchange>>,
    pub max_body_bytes: usize,
}

/// HTTP front end for a [`Router`].
pub struct HttpServer {
    app: axum::Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `router`.
    pub fn new(config: &RouterConfig, router: Arc<Router<Exchange>>) -> Self {
        let state = AppState {
            router,
            max_body_bytes: config.listener.max_body_bytes,
        };
        Self {
            app: Self::build_app(config, state),
        }
    }

    /// Build the axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(route_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The assembled app, for embedding or in-process testing.
    pub fn into_app(self) -> axum::Router {
        self.app
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Buffers the body, routes the request and renders the exchange.
async fn route_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(path = %parts.uri.path(), error = %e, "Failed to read request body");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let mut exchange = Exchange::new(parts, body);
    let outcome = state.router.serve(&mut exchange);

    tracing::debug!(
        request_id = exchange.request_id().unwrap_or("unknown"),
        method = exchange.method(),
        path = exchange.path(),
        outcome = outcome.as_str(),
        status = exchange.status().as_u16(),
        "Request routed"
    );
    metrics::record_duration(exchange.method(), outcome, start_time);

    exchange.into_response()
}
