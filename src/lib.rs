//! lotus-agents - multi-agent code generation pipeline for microservices
//!
//! A service is described once ([`ServiceDescriptor`]) and handed to a
//! [`Pipeline`] of generation stages. Each stage prompts a language model,
//! pulls fenced code blocks out of the reply as [`Artifact`]s, and passes a
//! bounded prefix of its output on to later stages. The finished run is saved
//! by [`ArtifactWriter`] as one directory per stage.
//!
//! # Example Usage
//!
//! ```no_run
//! use lotus_agents::{
//!     select_llm_client, service, ArtifactWriter, LotusConfig, Pipeline,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = LotusConfig::from_env()?;
//! let selected = select_llm_client(&config)?;
//!
//! let pipeline = Pipeline::standard(selected.client, config.pipeline_settings());
//! let result = pipeline
//!     .run(&CancellationToken::new(), Arc::new(service::presets::payments()))
//!     .await?;
//!
//! ArtifactWriter::save(&result, Path::new("./generated"))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`service`]: service descriptors, file loading and built-in presets
//! - [`llm`]: generation client trait, genai-backed client and a mock
//! - [`pipeline`]: stages, context threading, artifact extraction
//! - [`output`]: on-disk layout and run reports
//! - [`progress`]: run progress events

pub mod cli;
pub mod config;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod service;
pub mod util;

pub use config::{ConfigError, LotusConfig};
pub use llm::{select_llm_client, BackendError, GenAIClient, LLMClient, MockLLMClient};
pub use output::ArtifactWriter;
pub use pipeline::{
    extract, AgentStage, Artifact, ContextKey, ExecutionContext, Pipeline, PipelineError,
    PipelineRunResult, PipelineSettings, Stage, StageKind, StageResult,
};
pub use progress::{LoggingHandler, NoOpHandler, ProgressEvent, ProgressHandler};
pub use service::{DescriptorError, ServiceDescriptor};
pub use util::{init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "lotus-agents");
    }
}
