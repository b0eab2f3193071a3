//! HTTP server setup and request handling.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all gateway handler
//! - Wire up middleware (tracing, timeout, body limits, request ID, Vary)
//! - Plan every request through the routing core
//! - Apply directives: answer redirects and not-founds directly, forward
//!   rewrites to the upstream renderer
//! - Persist the locale cookie when the planner asks for it

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, Uri},
    response::Response,
    routing::{any, get},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::{CookieConfig, GatewayConfig, UpstreamConfig};
use crate::config::validation::{build_routing, ValidationError};
use crate::http::request::{self, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::navigation::prefix_with_locale;
use crate::routing::planner::{Directive, RequestPlanner, RewritePlan};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<RequestPlanner>,
    pub client: Client<HttpConnector, Body>,
    pub upstream: UpstreamConfig,
    pub cookie: CookieConfig,
}

/// HTTP server for the locale gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server, compiling the routing state from the
    /// given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ValidationError> {
        let (registry, table) = build_routing(&config)?;
        let planner = Arc::new(RequestPlanner::new(registry, table));

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let state = AppState {
            planner,
            client,
            upstream: config.upstream.clone(),
            cookie: config.cookie.clone(),
        };

        Ok(Self {
            router: Self::build_router(&config, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(SetResponseHeaderLayer::if_not_present(
                header::VARY,
                HeaderValue::from_static("Accept-Language, Cookie"),
            ))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[derive(Serialize)]
struct SystemStatus {
    version: &'static str,
    status: &'static str,
}

async fn health_handler() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Main gateway handler: plan the request, apply the directive.
async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let cookie_locale = request::cookie_value(request.headers(), &state.cookie.name);
    let accept = request::accept_language(request.headers()).map(str::to_string);

    let directive = state
        .planner
        .plan(&path, cookie_locale.as_deref(), accept.as_deref());

    match directive {
        Directive::NotFound => {
            tracing::debug!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_directive("not_found", None, start);
            response::not_found_response()
        }
        Directive::Redirect(plan) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                target = %plan.target,
                "Redirecting to canonical localized path"
            );
            metrics::record_directive("redirect", None, start);
            response::redirect_response(&plan, query.as_deref(), &state.cookie)
        }
        Directive::Rewrite(plan) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                canonical_id = %plan.canonical_id,
                locale = %plan.locale,
                "Rewriting to canonical route"
            );
            forward_rewrite(&state, request, plan, query.as_deref(), &request_id, start).await
        }
    }
}

/// Forward a rewritten request to the upstream renderer and relay its
/// response.
async fn forward_rewrite(
    state: &AppState,
    request: Request<Body>,
    plan: RewritePlan,
    query: Option<&str>,
    request_id: &str,
    start: Instant,
) -> Response {
    let internal_path = state
        .planner
        .table()
        .get(&plan.canonical_id)
        .and_then(|entry| entry.canonical_pattern().render(&plan.params).ok())
        .map(|path| prefix_with_locale(&plan.locale, &path));

    let internal_path = match internal_path {
        Some(path) => path,
        None => {
            // The planner only emits ids from the table, so this is a
            // routing-state bug, not a client error.
            tracing::error!(
                request_id = %request_id,
                canonical_id = %plan.canonical_id,
                "Rewrite target could not be rendered"
            );
            return response::not_found_response();
        }
    };

    let uri_string = match query {
        Some(q) => format!("http://{}{}?{}", state.upstream.address, internal_path, q),
        None => format!("http://{}{}", state.upstream.address, internal_path),
    };
    let uri: Uri = match uri_string.parse() {
        Ok(uri) => uri,
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, uri = %uri_string, "Invalid upstream URI");
            return response::bad_gateway_response();
        }
    };

    let (parts, body) = request.into_parts();
    let mut upstream_request = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);

    if let Some(headers) = upstream_request.headers_mut() {
        for (key, value) in parts.headers.iter() {
            headers.insert(key.clone(), value.clone());
        }
        if let Ok(value) = HeaderValue::from_str(plan.locale.as_str()) {
            headers.insert("x-locale", value);
        }
        if let Ok(value) = HeaderValue::from_str(&plan.canonical_id) {
            headers.insert("x-canonical-route", value);
        }
    }

    let upstream_request = match upstream_request.body(body) {
        Ok(request) => request,
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "Failed to build upstream request");
            return response::bad_gateway_response();
        }
    };

    match state.client.request(upstream_request).await {
        Ok(upstream_response) => {
            metrics::record_directive("rewrite", Some(plan.locale.as_str()), start);
            metrics::record_upstream(upstream_response.status().as_u16());

            let (mut parts, body) = upstream_response.into_parts();
            if let Some(locale) = &plan.set_locale_cookie {
                parts.headers.append(
                    header::SET_COOKIE,
                    response::set_cookie_header(&state.cookie, locale),
                );
            }
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "Upstream error");
            metrics::record_directive("rewrite_failed", Some(plan.locale.as_str()), start);
            response::bad_gateway_response()
        }
    }
}
