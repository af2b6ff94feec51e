//! Process readiness state machine.
//!
//! # States
//! - NotReady: startup work (model load, warm-up) still in flight
//! - Ready: startup complete, traffic-dependent routes may be served
//!
//! # State Transitions
//! ```text
//! NotReady → Ready: startup task calls mark_ready() (one-way, terminal)
//! ```
//!
//! # Design Decisions
//! - Single writer (the startup task), many readers (probe handlers)
//! - Release/Acquire pair so readers observe the flip atomically
//! - Liveness has no internal failure transition; the process is alive
//!   until an orchestrator decides otherwise

use std::sync::atomic::{AtomicBool, Ordering};

/// Shared readiness/liveness flags for the process.
///
/// Created once at startup with `ready = false, alive = true` and handed to
/// both the startup task and the probe handlers behind an `Arc`.
#[derive(Debug)]
pub struct ReadinessState {
    ready: AtomicBool,
    alive: AtomicBool,
}

impl ReadinessState {
    /// Create the initial state: not ready, alive.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            alive: AtomicBool::new(true),
        }
    }

    /// Mark startup as complete. One-way; calling it again is a no-op.
    ///
    /// `Release` ordering publishes everything the startup task wrote
    /// (model slot included) to any reader that observes `ready == true`.
    pub fn mark_ready(&self) {
        if !self.ready.swap(true, Ordering::Release) {
            tracing::info!("service marked ready");
        }
    }

    /// Whether startup has completed. Never blocks, never fails.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether the process is alive. Never blocks, never fails.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_not_ready_but_alive() {
        let state = ReadinessState::new();
        assert!(!state.is_ready());
        assert!(state.is_alive());
    }

    #[test]
    fn mark_ready_is_one_way_and_idempotent() {
        let state = ReadinessState::new();
        state.mark_ready();
        assert!(state.is_ready());
        state.mark_ready();
        assert!(state.is_ready());
        assert!(state.is_alive());
    }

    #[test]
    fn flip_is_visible_across_threads() {
        let state = Arc::new(ReadinessState::new());

        let writer = {
            let state = state.clone();
            std::thread::spawn(move || state.mark_ready())
        };
        writer.join().unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || state.is_ready())
            })
            .collect();
        for reader in readers {
            assert!(reader.join().unwrap());
        }
    }
}
