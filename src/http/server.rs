//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (tracing, request ID)
//! - Dispatch requests through the route table
//! - Forward matched requests; hand the rest to the fallback
//! - Turn every per-request failure into an HTTP response

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::fallback::Fallback;
use crate::http::response::error_response;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::RouteTable;
use crate::upstream::{BuildError, UpstreamManager};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub upstreams: Arc<UpstreamManager>,
    pub fallback: Arc<Fallback>,
}

/// HTTP server for the dev proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Compile the configuration into a ready-to-serve router.
    pub fn new(config: ProxyConfig) -> Result<Self, BuildError> {
        let upstreams = Arc::new(UpstreamManager::from_config(&config.upstreams)?);
        let routes = Arc::new(RouteTable::from_config(&config.routes, &upstreams)?);
        let fallback = Arc::new(Fallback::from_config(&config.fallback, &upstreams)?);

        tracing::info!(
            upstreams = upstreams.len(),
            routes = routes.len(),
            fallback = %fallback.label(),
            "Router built"
        );

        let state = AppState {
            routes,
            upstreams,
            fallback,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state);

        let router = if config.observability.request_id {
            router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        } else {
            router
        };

        router.layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.stopped().await;
                tracing::info!("Shutdown requested, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Matches the request target, then forwards or falls back.
async fn proxy_handler(
    State(state): State<AppState>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let request_target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let (label, response) = match state.routes.match_route(&request_target) {
        Some(route) => {
            let name = route.target().name.clone();
            tracing::debug!(
                request_id = %request_id,
                client = %client,
                method = %method,
                target = %request_target,
                pattern = %route.pattern(),
                upstream = %name,
                "Route matched"
            );
            let response = forward_to(&state, &name, request, &request_id).await;
            (name, response)
        }
        None => {
            tracing::debug!(
                request_id = %request_id,
                client = %client,
                method = %method,
                target = %request_target,
                "No route matched, using fallback"
            );
            let response = match state.fallback.as_ref() {
                Fallback::Static(files) => files.serve(request).await,
                Fallback::Upstream(name) => forward_to(&state, name, request, &request_id).await,
            };
            (state.fallback.label().to_string(), response)
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), &label, start_time);
    response
}

async fn forward_to(state: &AppState, upstream: &str, request: Request<Body>, request_id: &str) -> Response {
    let Some(forwarder) = state.upstreams.forwarder(upstream) else {
        tracing::error!(request_id = %request_id, upstream = %upstream, "No forwarder for upstream");
        return error_response(StatusCode::BAD_GATEWAY, "Unknown upstream", Some(upstream));
    };

    match forwarder.forward(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, upstream = %upstream, error = %e, "Upstream error");
            metrics::record_upstream_error(upstream, &e);
            e.into_response()
        }
    }
}
