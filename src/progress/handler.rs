//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a generation pass runs
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Pass started over this many syntax trees
    Started { trees: usize },

    PhaseStarted { phase: String },

    PhaseComplete { phase: String, duration: Duration },

    /// Pass ended without output
    Skipped { reason: String },

    /// Provider source rendered
    Completed {
        functions: usize,
        total_time: Duration,
    },

    /// Cancellation observed; nothing was published
    Cancelled,
}

/// Trait for handling progress events during generation
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}
