//! HTTP surface: liveness, health and the plan endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tokio::net::TcpListener;
use tracing::Instrument;
use uuid::Uuid;

use crate::models::{Config, PlanRequest, PlanResponse};
use crate::planner::EventPlanner;
use crate::{Error, Result};

// ---------------------------------------------------------------------------
// State and errors
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<EventPlanner>,
}

impl AppState {
    pub fn new(planner: EventPlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

/// Failure returned to clients as `{"detail": "..."}`.
pub struct AppError {
    status: StatusCode,
    detail: String,
}

impl AppError {
    pub fn internal(err: Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = json!({ "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/plan-event", post(plan_event))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

/// A `*` entry admits any origin; otherwise only the listed origins pass.
///
/// Credentials are allowed, so the wildcard is expressed by mirroring the
/// request origin rather than by a literal `*` header.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                }),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(config: &Config, planner: EventPlanner) -> Result<()> {
    let app = build_router(AppState::new(planner), &config.cors_allowed_origins);
    let listener = bind_listener(config).await?;
    tracing::info!("EventGenie API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("EventGenie API shut down");
    Ok(())
}

/// `BIND_ADDR` may be a hostname such as `localhost`; it is resolved on bind.
async fn bind_listener(config: &Config) -> Result<TcpListener> {
    Ok(TcpListener::bind((config.bind_addr.as_str(), config.port)).await?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "EventGenie API is running!" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn plan_event(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> std::result::Result<Json<PlanResponse>, AppError> {
    let span = tracing::info_span!("plan_event", request_id = %Uuid::new_v4());

    async move {
        tracing::info!(
            "Planning event at '{}' on {} {}",
            request.location,
            request.date,
            request.time
        );
        match state.planner.plan_event(&request).await {
            Ok(plan) => {
                tracing::info!("Plan ready");
                Ok(Json(plan))
            }
            Err(e) => {
                tracing::error!("Plan request failed: {}", e);
                Err(AppError::internal(e))
            }
        }
    }
    .instrument(span)
    .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
