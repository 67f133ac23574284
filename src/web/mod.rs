//! Web front-end: HTML form plus a small JSON API
//!
//! Routes:
//! - `GET  /`            form
//! - `POST /predict`     form submit, renders the risk panel
//! - `POST /api/predict` JSON field map in, `{label, probability, risk}` out
//! - `GET  /health`      liveness

pub mod form;
pub mod render;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Form, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::inference::InferenceService;
use crate::schema::stringify_json_values;
use render::Outcome;

/// Shared across handlers. The service is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
}

#[derive(Debug, Serialize)]
struct ApiPrediction {
    label: u8,
    probability: f64,
    risk: &'static str,
    warnings: Vec<String>,
}

pub fn router(service: Arc<InferenceService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_api))
        .route("/health", get(health))
        .with_state(AppState { service })
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(bind: &str, service: Arc<InferenceService>) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}'"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("serving attrition form on http://{addr}");
    println!("HR Attrition Predictor running at http://{addr}");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

async fn index() -> Html<String> {
    Html(render::render_page(&HashMap::new(), None))
}

async fn predict_form(
    State(state): State<AppState>,
    Form(values): Form<HashMap<String, String>>,
) -> Html<String> {
    let (features, warnings) = form::decode_submission(&values);
    let prediction = state.service.predict_features(&features);
    let outcome = Outcome {
        prediction: &prediction,
        warnings: &warnings,
    };
    Html(render::render_page(&values, Some(&outcome)))
}

async fn predict_api(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Map<String, serde_json::Value>>,
) -> Json<ApiPrediction> {
    let raw = stringify_json_values(&body);
    let (prediction, warnings) = state.service.predict_lenient(&raw);
    Json(ApiPrediction {
        label: prediction.label,
        probability: prediction.probability,
        risk: if prediction.is_attrition() { "high" } else { "low" },
        warnings: warnings.iter().map(ToString::to_string).collect(),
    })
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
