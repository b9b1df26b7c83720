//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { trees } => {
                info!(trees, "Starting metadata generation");
            }
            ProgressEvent::PhaseStarted { phase } => {
                debug!(phase = %phase, "Starting phase");
            }
            ProgressEvent::PhaseComplete { phase, duration } => {
                info!(
                    phase = %phase,
                    duration_ms = duration.as_millis(),
                    "Phase complete"
                );
            }
            ProgressEvent::Skipped { reason } => {
                info!(reason = %reason, "Generation skipped");
            }
            ProgressEvent::Completed {
                functions,
                total_time,
            } => {
                info!(
                    functions,
                    total_time_ms = total_time.as_millis(),
                    "Generation complete"
                );
            }
            ProgressEvent::Cancelled => {
                warn!("Generation cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::Started { trees: 3 },
            ProgressEvent::PhaseStarted {
                phase: "scan".to_string(),
            },
            ProgressEvent::PhaseComplete {
                phase: "scan".to_string(),
                duration: Duration::from_millis(2),
            },
            ProgressEvent::Skipped {
                reason: "no call sites".to_string(),
            },
            ProgressEvent::Completed {
                functions: 2,
                total_time: Duration::from_millis(5),
            },
            ProgressEvent::Cancelled,
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
