use super::agents::{AgentStage, StageKind};
use super::config::PipelineSettings;
use super::context::{ContextKey, ExecutionContext};
use super::stage::{Stage, StageBuilder, StageResult};
use crate::llm::{BackendError, LLMClient};
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use crate::service::ServiceDescriptor;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("stage '{stage}' failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: BackendError,
    },

    #[error("pipeline cancelled at stage '{stage}'")]
    Cancelled { stage: String },
}

impl PipelineError {
    pub fn stage(&self) -> &str {
        match self {
            PipelineError::StageFailed { stage, .. } | PipelineError::Cancelled { stage } => stage,
        }
    }
}

/// Outcome of a run where every stage succeeded
#[derive(Debug, Clone)]
pub struct PipelineRunResult {
    pub descriptor: Arc<ServiceDescriptor>,
    pub stage_results: Vec<StageResult>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl PipelineRunResult {
    pub fn duration(&self) -> Duration {
        (self.end_time - self.start_time)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    pub fn artifact_count(&self) -> usize {
        self.stage_results.iter().map(|r| r.artifacts.len()).sum()
    }
}

struct StageEntry {
    key: ContextKey,
    builder: StageBuilder,
}

/// Runs an ordered list of stages against one service descriptor.
///
/// Stages run strictly one after another. Each stage sees the truncated
/// output of every stage before it; the first failure aborts the run.
pub struct Pipeline {
    entries: Vec<StageEntry>,
    settings: PipelineSettings,
    progress: Arc<dyn ProgressHandler>,
}

impl Pipeline {
    pub fn new(settings: PipelineSettings) -> Self {
        Self {
            entries: Vec::new(),
            settings,
            progress: Arc::new(NoOpHandler),
        }
    }

    /// The four agent stages in their fixed order, all sharing `client`.
    pub fn standard(client: Arc<dyn LLMClient>, settings: PipelineSettings) -> Self {
        let mut pipeline = Self::new(settings.clone());
        for kind in StageKind::ALL {
            let client = client.clone();
            let settings = settings.clone();
            pipeline = pipeline.with_stage(
                kind.context_key(),
                Box::new(move |descriptor: &ServiceDescriptor| -> Box<dyn Stage> {
                    Box::new(AgentStage::new(kind, client.clone(), descriptor, &settings))
                }),
            );
        }
        pipeline
    }

    pub fn with_stage(mut self, key: ContextKey, builder: StageBuilder) -> Self {
        self.entries.push(StageEntry { key, builder });
        self
    }

    pub fn with_progress(mut self, handler: Arc<dyn ProgressHandler>) -> Self {
        self.progress = handler;
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub async fn run(
        &self,
        cancel: &CancellationToken,
        descriptor: Arc<ServiceDescriptor>,
    ) -> Result<PipelineRunResult, PipelineError> {
        let start_time = Utc::now();
        let started = Instant::now();
        let total = self.entries.len();

        info!(service = %descriptor.name, stages = total, "Starting pipeline run");
        self.progress.on_progress(&ProgressEvent::RunStarted {
            service: descriptor.name.clone(),
            stages: total,
        });

        let mut context = ExecutionContext::new(self.settings.context_cap);
        context.insert(ContextKey::Project, &descriptor.render_prompt());

        let mut stage_results = Vec::with_capacity(total);

        for (i, entry) in self.entries.iter().enumerate() {
            let stage = (entry.builder)(&descriptor);
            let stage_name = stage.name().to_string();
            let index = i + 1;

            self.progress.on_progress(&ProgressEvent::StageStarted {
                stage: stage_name.clone(),
                index,
                total,
            });

            if cancel.is_cancelled() {
                return Err(self.cancelled(stage_name));
            }

            let stage_start = Instant::now();
            let result = match stage.run(cancel, &descriptor, &context).await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => return Err(self.cancelled(stage_name)),
                Err(e) => {
                    warn!(stage = %stage_name, error = %e, "Stage failed, aborting run");
                    self.progress.on_progress(&ProgressEvent::Failed {
                        stage: stage_name.clone(),
                        error: e.to_string(),
                    });
                    return Err(PipelineError::StageFailed {
                        stage: stage_name,
                        source: e,
                    });
                }
            };

            context.insert(entry.key, &result.raw_output);
            debug!(
                stage = %stage_name,
                key = %entry.key,
                raw_chars = result.raw_output.chars().count(),
                "Stored stage output in context"
            );

            self.progress.on_progress(&ProgressEvent::StageCompleted {
                stage: stage_name,
                index,
                total,
                artifacts: result.artifacts.len(),
                duration: stage_start.elapsed(),
            });
            stage_results.push(result);
        }

        let end_time = Utc::now();
        info!(
            service = %descriptor.name,
            duration_ms = started.elapsed().as_millis() as u64,
            "Pipeline run complete"
        );
        self.progress.on_progress(&ProgressEvent::Completed {
            stages: stage_results.len(),
            total_time: started.elapsed(),
        });

        Ok(PipelineRunResult {
            descriptor,
            stage_results,
            start_time,
            end_time,
        })
    }

    fn cancelled(&self, stage: String) -> PipelineError {
        warn!(stage = %stage, "Pipeline cancelled");
        self.progress.on_progress(&ProgressEvent::Cancelled {
            stage: stage.clone(),
        });
        PipelineError::Cancelled { stage }
    }
}
