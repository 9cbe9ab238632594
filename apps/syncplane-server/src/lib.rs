//! # syncplane server
//!
//! Wires the syncplane API, health check and API docs into one router.
//!
//! - `GET /health` - Service and database health
//! - `GET /docs` - Swagger UI
//! - `POST /api/v1/...` - Configuration API

pub mod config;
pub mod health;
pub mod logging;
pub mod openapi;

use std::time::Duration;

use axum::{
    http::{header, request::Parts, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use syncplane_api::{api_routes, ApiState};

use health::{health_handler, HealthState};
use openapi::swagger_routes;

/// Mount point of the configuration API.
pub const API_PREFIX: &str = "/api/v1";

/// Build the full application router.
pub fn build_router(health: HealthState, api: ApiState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .merge(swagger_routes())
        .with_state(health)
        .nest(API_PREFIX, api_routes(api))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(cors_origins))
}

/// Build the CORS layer from configured origins.
///
/// A single `*` allows any origin with any method and header. Otherwise only
/// the listed origins pass and rejections are logged.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let is_wildcard = origins.len() == 1 && origins[0] == "*";

    let layer = CorsLayer::new().max_age(Duration::from_secs(3600));
    if is_wildcard {
        return layer
            .allow_origin(AllowOrigin::any())
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req: &Parts| {
                let is_allowed = allowed.contains(origin);
                if !is_allowed {
                    tracing::warn!(
                        origin = %origin.to_str().unwrap_or("<non-utf8>"),
                        "CORS origin rejected"
                    );
                }
                is_allowed
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
}
