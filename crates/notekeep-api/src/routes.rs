//! Router assembly.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use notekeep_core::logging::{OWNER_ID, REQUEST_ID};

use crate::handlers::{health, notes};
use crate::middleware::{rate_limit_middleware, MakeRequestUuidV7};
use crate::state::AppState;

/// Outer-surface settings applied as tower layers.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub allowed_origins: Vec<HeaderValue>,
    pub max_body_bytes: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_bytes: notekeep_core::defaults::MAX_BODY_BYTES,
        }
    }
}

pub fn build_router(state: AppState, config: RouterConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            state.identity_header.clone(),
        ])
        .max_age(Duration::from_secs(3600));

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            { REQUEST_ID } = %request_id,
            { OWNER_ID } = Empty,
        )
    });

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/notes/stats/summary", get(notes::note_stats))
        .route(
            "/api/notes/:id",
            get(notes::get_note)
                .put(notes::update_note)
                .patch(notes::update_note)
                .delete(notes::delete_note),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(trace)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .with_state(state)
}
