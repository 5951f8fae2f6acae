//! Progress handler trait and events

use std::time::Duration;

/// Events emitted while a pipeline run progresses
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started for a service
    RunStarted { service: String, stages: usize },

    /// Stage about to invoke the generation client (`index` is 1-based)
    StageStarted {
        stage: String,
        index: usize,
        total: usize,
    },

    /// Stage finished and its output was folded into the context
    StageCompleted {
        stage: String,
        index: usize,
        total: usize,
        artifacts: usize,
        duration: Duration,
    },

    /// Every stage succeeded
    Completed { stages: usize, total_time: Duration },

    /// Run aborted at `stage`
    Failed { stage: String, error: String },

    /// Run cancelled before or during `stage`
    Cancelled { stage: String },
}

/// Trait for handling progress events during a pipeline run
pub trait ProgressHandler: Send + Sync {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    impl ProgressHandler for CountingHandler {
        fn on_progress(&self, _event: &ProgressEvent) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_handler() {
        let handler = NoOpHandler;
        handler.on_progress(&ProgressEvent::RunStarted {
            service: "orders".to_string(),
            stages: 4,
        });
    }

    #[test]
    fn test_progress_events() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            count: count.clone(),
        };

        handler.on_progress(&ProgressEvent::RunStarted {
            service: "orders".to_string(),
            stages: 1,
        });
        handler.on_progress(&ProgressEvent::StageStarted {
            stage: "API Design Agent".to_string(),
            index: 1,
            total: 1,
        });
        handler.on_progress(&ProgressEvent::Completed {
            stages: 1,
            total_time: Duration::from_secs(5),
        });

        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_event_debug() {
        let event = ProgressEvent::Cancelled {
            stage: "Messaging & Events Agent".to_string(),
        };
        let debug_str = format!("{:?}", event);
        assert!(debug_str.contains("Cancelled"));
        assert!(debug_str.contains("Messaging & Events Agent"));
    }
}
