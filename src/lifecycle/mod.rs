//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load model artifact → warm-up predict → publish slot → mark ready
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C / trigger → broadcast → server drains → exit
//! ```
//!
//! # Design Decisions
//! - Readiness flips only at the end of a fully successful startup
//! - The server starts before startup completes so probes stay servable
//!   while the model loads

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{initialize, StartupError};
