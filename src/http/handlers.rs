//! Route handlers.
//!
//! # Responsibilities
//! - Probe endpoints: trivial `ReadinessState` reads, no span, no event
//! - `POST /predict/`: validate, open the inference span, invoke the
//!   model, log exactly one correlated record, answer or map the failure

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::model::IrisFeatures;
use crate::observability::{SpanStatus, TraceContext};

/// Fixed welcome string served at the root.
pub const WELCOME_MESSAGE: &str = "Welcome to the Iris Classifier API!v4";

/// Successful prediction body.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub predicted_class: String,
}

/// `GET /` — service banner.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

/// `GET /health` — unconditional liveness-independent check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// `GET /live_check` — 200 while the process is alive, else 500 empty.
pub async fn live_check(State(state): State<AppState>) -> Response {
    if state.readiness.is_alive() {
        (StatusCode::OK, Json(json!({ "status": "alive" }))).into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// `GET /ready_check` — 200 once startup completed, else 503 empty.
pub async fn ready_check(State(state): State<AppState>) -> Response {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
    } else {
        StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
}

/// `POST /predict/` — classify one iris record.
///
/// Validation failures short-circuit before any span or log work tied
/// to inference. A model failure is logged with full detail under
/// `prediction_error` and surfaced only as the generic 500 envelope.
pub async fn predict(
    State(state): State<AppState>,
    Extension(ctx): Extension<TraceContext>,
    payload: Result<Json<IrisFeatures>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(features) = payload.map_err(ApiError::from_rejection)?;

    let Some(model) = state.model.get() else {
        return Err(ApiError::NotReady);
    };

    let span = state.tracer.begin_child("predict", &ctx);
    let trace_id = span.trace_id_hex();
    let start = Instant::now();

    match model.predict(&features) {
        Ok(label) => {
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
            tracing::info!(
                event = "prediction",
                trace_id = %trace_id,
                sepal_length = features.sepal_length,
                sepal_width = features.sepal_width,
                petal_length = features.petal_length,
                petal_width = features.petal_width,
                predicted_class = %label,
                latency_ms = latency_ms,
                status = "success",
                "prediction served"
            );
            span.end(SpanStatus::Ok);
            Ok(Json(PredictionResponse {
                predicted_class: label,
            }))
        }
        Err(error) => {
            tracing::error!(
                event = "prediction_error",
                trace_id = %trace_id,
                error = %error,
                "model invocation failed"
            );
            span.end(SpanStatus::Error);
            Err(ApiError::Model { trace_id })
        }
    }
}
