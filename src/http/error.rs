//! Centralized failure-to-response mapping.
//!
//! # Responsibilities
//! - Classify failures: client validation, model invocation, unhandled
//! - Translate every server-side failure into the uniform envelope
//! - Emit the `unhandled_exception` record for unclassified failures
//!
//! # Design Decisions
//! - Explicit error values instead of panic/exception propagation; the
//!   `IntoResponse` impl is the single last-resort adapter. Panics that
//!   escape a handler anyway are caught by the trace-context
//!   interceptor and fed back through `ApiError::Internal`
//! - Model failures are logged at the call site (`prediction_error`);
//!   this adapter only builds their envelope, so each failure produces
//!   exactly one log record
//! - The caller never sees internal error text, only the generic detail
//!   string and a trace id usable to find the full record out-of-band

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Client-visible detail for every 500 response.
pub const GENERIC_ERROR_DETAIL: &str = "Internal server error";

/// Uniform client-visible shape for server-side failures.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub detail: String,
    pub trace_id: String,
}

impl ErrorEnvelope {
    pub fn new(trace_id: String) -> Self {
        Self {
            detail: GENERIC_ERROR_DETAIL.to_string(),
            trace_id,
        }
    }
}

/// Failures a request can end with, ordered from client to server fault.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed client input. Recovered by the validation layer; never
    /// logged as a server fault, never reaches the model.
    #[error("invalid request payload: {detail}")]
    Validation { status: StatusCode, detail: String },

    /// Startup has not published the model yet.
    #[error("model not loaded")]
    NotReady,

    /// The model raised during prediction. Already logged as
    /// `prediction_error` where it happened.
    #[error("model invocation failed")]
    Model { trace_id: String },

    /// Anything else that escaped the route logic.
    #[error("unhandled failure: {detail}")]
    Internal {
        detail: String,
        trace_id: String,
        path: String,
    },
}

impl ApiError {
    /// Classify a JSON extraction failure as a validation error.
    pub fn from_rejection(rejection: JsonRejection) -> Self {
        ApiError::Validation {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

/// Printable summary of a caught panic payload, for the log record.
pub fn panic_detail(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[derive(Serialize)]
struct ValidationBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation { status, detail } => {
                (status, Json(ValidationBody { detail })).into_response()
            }
            ApiError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ValidationBody {
                    detail: "model is still loading".to_string(),
                }),
            )
                .into_response(),
            ApiError::Model { trace_id } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorEnvelope::new(trace_id)),
            )
                .into_response(),
            ApiError::Internal {
                detail,
                trace_id,
                path,
            } => {
                tracing::error!(
                    event = "unhandled_exception",
                    trace_id = %trace_id,
                    path = %path,
                    error = %detail,
                    "unhandled failure while handling request"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorEnvelope::new(trace_id)),
                )
                    .into_response()
            }
        }
    }
}
