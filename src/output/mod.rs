//! Persisting and reporting pipeline runs

pub mod report;
pub mod writer;

pub use report::{OutputFormat, OutputFormatter, RunReport};
pub use writer::{render_summary, sanitize_stage_name, ArtifactWriter, OUTPUT_LOG_FILE, SUMMARY_FILE};
