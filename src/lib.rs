//! Iris Classifier Inference Service Library

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;

pub use config::ServiceConfig;
pub use health::ReadinessState;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
