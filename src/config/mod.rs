//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → ServiceConfig (immutable once loaded)
//!     → shared with subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs

pub mod loader;
pub mod schema;

pub use loader::{load, ConfigError};
pub use schema::{ListenerConfig, ModelConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig};
