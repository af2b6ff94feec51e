//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, route table, middleware wiring)
//!     → middleware/ (timing clock starts, trace context injected)
//!     → handlers.rs (validation, model call, structured events)
//!     → error.rs (failures mapped to the uniform envelope)
//!     → middleware/ (span ended, X-Process-Time-ms stamped)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ErrorEnvelope, GENERIC_ERROR_DETAIL};
pub use middleware::PROCESS_TIME_HEADER;
pub use server::{AppState, HttpServer};
