//! HTTP surface of the travel planner.
//!
//! - `GET /` service metadata
//! - `GET /health` liveness and generation status
//! - `POST /api/plan-trip` build a plan from a [`TravelRequest`]

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    core::Orchestrator,
    error::{PlannerError, Result},
    services::plan_log::PlanLog,
    types::{CompositePlan, TravelRequest},
};

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    plan_log: Option<PlanLog>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            plan_log: Some(PlanLog::default()),
        }
    }

    pub fn with_plan_log(mut self, plan_log: Option<PlanLog>) -> Self {
        self.plan_log = plan_log;
        self
    }
}

/// Simple health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub agents: usize,
    pub ai_configured: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_root))
        .route("/health", get(health_check))
        .route("/api/plan-trip", post(plan_trip))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn read_root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "AI Travel Planner API",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_enabled": state.orchestrator.ai_enabled(),
        "endpoints": {
            "POST /api/plan-trip": "Create a complete travel plan"
        }
    }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        agents: state.orchestrator.agent_count(),
        ai_configured: state.orchestrator.ai_enabled(),
    })
}

async fn plan_trip(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TravelRequest>, JsonRejection>,
) -> Result<Json<CompositePlan>> {
    let Json(request) =
        payload.map_err(|rejection| PlannerError::InvalidRequest(rejection.body_text()))?;

    let plan = state
        .orchestrator
        .create_plan(&request)
        .await
        .inspect_err(|err| match err {
            PlannerError::InvalidRequest(_) => warn!(error = %err, "rejected travel request"),
            _ => error!(error = %err, "error creating travel plan"),
        })?;

    // The log is a side artifact; the caller still gets the plan.
    if let Some(plan_log) = &state.plan_log {
        if let Err(err) = plan_log.write(&plan).await {
            warn!(error = %err, dir = %plan_log.dir().display(), "failed to save travel plan");
        }
    }

    Ok(Json(plan))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    use anyhow::Context;

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("travel planner shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
