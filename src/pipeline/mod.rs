//! Stage pipeline: context threading, artifact extraction and orchestration

pub mod agents;
pub mod config;
pub mod context;
pub mod extractor;
pub mod naming;
pub mod orchestrator;
pub mod stage;

pub use agents::{AgentStage, StageKind};
pub use config::PipelineSettings;
pub use context::{truncate_chars, ContextKey, ExecutionContext};
pub use extractor::{extract, Artifact};
pub use naming::{assign_default_names, confine, extension_for, STAGE_LOG_FILE};
pub use orchestrator::{Pipeline, PipelineError, PipelineRunResult};
pub use stage::{Stage, StageBuilder, StageResult};
