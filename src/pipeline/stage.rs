use super::context::ExecutionContext;
use super::extractor::Artifact;
use crate::llm::BackendError;
use crate::service::ServiceDescriptor;
use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Output of one stage invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageResult {
    pub stage_name: String,
    /// Full text returned by the generation client, never truncated
    #[serde(skip)]
    pub raw_output: String,
    pub artifacts: Vec<Artifact>,
}

impl StageResult {
    pub fn new(stage_name: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            raw_output: raw_output.into(),
            artifacts: Vec::new(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Vec<Artifact>) -> Self {
        self.artifacts = artifacts;
        self
    }
}

/// One unit of pipeline work.
///
/// A stage reads whatever prior context it needs and returns its result; it
/// never writes to the context itself.
#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &str;

    async fn run(
        &self,
        cancel: &CancellationToken,
        descriptor: &ServiceDescriptor,
        prior: &ExecutionContext,
    ) -> Result<StageResult, BackendError>;
}

/// Binds a stage to the descriptor of the run about to start
pub type StageBuilder = Box<dyn Fn(&ServiceDescriptor) -> Box<dyn Stage> + Send + Sync>;
