pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::UaaConfig;
use crate::error::AppError;
use crate::services::{JwtService, MemberStore, OAuthService};

/// Shared application state. Everything in here is read-only per request;
/// handlers never mutate cross-request state.
#[derive(Clone)]
pub struct AppState {
    pub config: UaaConfig,
    pub jwt: JwtService,
    pub members: Arc<dyn MemberStore>,
    pub oauth: OAuthService,
    pub store_timeout: Duration,
}

pub fn build_router(state: AppState) -> Result<Router, AppError> {
    // Member lookups sit behind bearer authentication; the token endpoint
    // authenticates its client inline via Basic auth.
    let member_routes = Router::new()
        .route(
            "/api/members/search/findByEmail",
            get(handlers::members::find_by_email),
        )
        .route(
            "/api/members/search/findByIds",
            get(handlers::members::find_by_ids),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = cors_layer(&state.config)?;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/oauth/token", post(handlers::oauth::token))
        .merge(member_routes)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(cors);

    Ok(app)
}

fn cors_layer(config: &UaaConfig) -> Result<CorsLayer, AppError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

/// Service health check; pings the member store.
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    services::store::with_timeout(state.store_timeout, state.members.health_check()).await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "checks": {
            "member_store": "up"
        }
    })))
}
