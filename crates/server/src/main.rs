use std::{net::SocketAddr, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use shared::{
    error::ErrorDetail,
    protocol::{EmailsResponse, HealthResponse, ServiceStatus, SummaryResponse},
};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{summarize, FixtureError, FixtureSource};
use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorDetail>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let state = AppState {
        project: settings.project_name,
        fixture: FixtureSource::new(&settings.fixture_path),
    };
    info!(fixture = %state.fixture.path().display(), "serving classified emails from fixture");
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/emails", get(list_emails))
        .route("/emails/summary", get(emails_summary))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        project: state.project.clone(),
        status: "running".into(),
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}

async fn list_emails(State(state): State<Arc<AppState>>) -> ApiResult<EmailsResponse> {
    let emails = state
        .fixture
        .load()
        .await
        .map_err(|e| fixture_error("Failed to load emails", e))?;
    info!(count = emails.emails.len(), "emails: served");
    Ok(Json(emails))
}

async fn emails_summary(State(state): State<Arc<AppState>>) -> ApiResult<SummaryResponse> {
    let emails = state
        .fixture
        .load()
        .await
        .map_err(|e| fixture_error("Failed to build email summary", e))?;
    Ok(Json(summarize(&emails.emails)))
}

fn fixture_error(context: &str, err: FixtureError) -> (StatusCode, Json<ErrorDetail>) {
    match err {
        FixtureError::Missing(_) => {
            error!(error = %err, "emails: fixture missing");
            (StatusCode::BAD_REQUEST, Json(ErrorDetail::new(err.to_string())))
        }
        other => {
            error!(error = %other, "emails: fixture unusable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetail::new(format!("{context}: {other}"))),
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
