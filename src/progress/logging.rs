//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{info, warn};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::RunStarted { service, stages } => {
                info!(service = %service, stages, "Starting generation pipeline");
            }
            ProgressEvent::StageStarted {
                stage,
                index,
                total,
            } => {
                info!(
                    stage = %stage,
                    progress = format!("{}/{}", index, total),
                    "Running stage"
                );
            }
            ProgressEvent::StageCompleted {
                stage,
                index,
                total,
                artifacts,
                duration,
            } => {
                info!(
                    stage = %stage,
                    progress = format!("{}/{}", index, total),
                    artifacts,
                    duration_ms = duration.as_millis(),
                    "Stage complete"
                );
            }
            ProgressEvent::Completed { stages, total_time } => {
                info!(
                    stages,
                    total_time_ms = total_time.as_millis(),
                    "Pipeline complete"
                );
            }
            ProgressEvent::Failed { stage, error } => {
                warn!(stage = %stage, error = %error, "Pipeline failed");
            }
            ProgressEvent::Cancelled { stage } => {
                warn!(stage = %stage, "Pipeline cancelled");
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
            ProgressEvent::RunStarted {
                service: "orders".to_string(),
                stages: 4,
            },
            ProgressEvent::StageStarted {
                stage: "API Design Agent".to_string(),
                index: 1,
                total: 4,
            },
            ProgressEvent::StageCompleted {
                stage: "API Design Agent".to_string(),
                index: 1,
                total: 4,
                artifacts: 3,
                duration: Duration::from_millis(1200),
            },
            ProgressEvent::Completed {
                stages: 4,
                total_time: Duration::from_secs(40),
            },
            ProgressEvent::Failed {
                stage: "Backend & Database Agent".to_string(),
                error: "rate limited".to_string(),
            },
            ProgressEvent::Cancelled {
                stage: "Testing & Security Agent".to_string(),
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
