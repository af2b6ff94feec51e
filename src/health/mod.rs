//! Health signaling subsystem.
//!
//! # Data Flow
//! ```text
//! startup task ──mark_ready()──▶ state.rs (atomic flags)
//!                                    ▲
//! probe handlers ──is_ready()────────┘
//!                  is_alive()
//! ```
//!
//! # Design Decisions
//! - Probes are plain reads: no span, no structured log record
//!   (health checks are high-frequency, low-value traffic)
//! - Readiness is one-way within a process lifetime

pub mod state;

pub use state::ReadinessState;
