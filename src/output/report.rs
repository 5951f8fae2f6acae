//! Console report of a completed run
//!
//! The human format mirrors the generated-files listing printed after a save;
//! JSON and YAML serialize the same [`RunReport`] for scripting.

use super::writer::sanitize_stage_name;
use crate::pipeline::PipelineRunResult;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable listing
    Human,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactEntry {
    pub filename: String,
    pub language: String,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageEntry {
    pub stage: String,
    pub directory: String,
    pub artifacts: Vec<ArtifactEntry>,
}

/// Serializable summary of a saved run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub service: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub stages: Vec<StageEntry>,
}

impl RunReport {
    pub fn new(result: &PipelineRunResult, output_dir: Option<&Path>) -> Self {
        let stages = result
            .stage_results
            .iter()
            .map(|stage| StageEntry {
                stage: stage.stage_name.clone(),
                directory: sanitize_stage_name(&stage.stage_name),
                artifacts: stage
                    .artifacts
                    .iter()
                    .map(|a| ArtifactEntry {
                        filename: a.filename.clone(),
                        language: a.language.clone(),
                        bytes: a.content.len(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            service: result.descriptor.name.clone(),
            language: result.descriptor.language.clone(),
            output_dir: output_dir.map(Path::to_path_buf),
            started_at: result.start_time,
            finished_at: result.end_time,
            duration_secs: result.duration().as_secs_f64(),
            stages,
        }
    }

    pub fn artifact_count(&self) -> usize {
        self.stages.iter().map(|s| s.artifacts.len()).sum()
    }
}

/// Output formatter for run reports
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize run report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize run report to YAML")
            }
            OutputFormat::Human => Ok(Self::format_human(report)),
        }
    }

    fn format_human(report: &RunReport) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "Pipeline completed in {:.0}s for {} ({})",
            report.duration_secs, report.service, report.language
        );
        if let Some(dir) = &report.output_dir {
            let _ = writeln!(out, "Saved to {}", dir.display());
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Generated files:");

        for stage in &report.stages {
            let _ = writeln!(
                out,
                "  {:<30} {} artifact(s)",
                stage.stage,
                stage.artifacts.len()
            );
            for artifact in &stage.artifacts {
                let _ = writeln!(out, "    └─ {}", artifact.filename);
            }
        }

        if let Some(dir) = &report.output_dir {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "See {} for a summary.",
                dir.join(super::writer::SUMMARY_FILE).display()
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{Artifact, StageResult};
    use crate::service::ServiceDescriptor;
    use std::sync::Arc;

    fn result() -> PipelineRunResult {
        let start_time = Utc::now();
        PipelineRunResult {
            descriptor: Arc::new(ServiceDescriptor::new("payments", "Moves money")),
            stage_results: vec![
                StageResult::new("API Design Agent", "raw").with_artifacts(vec![Artifact {
                    filename: "routes.go".to_string(),
                    language: "go".to_string(),
                    content: "package api".to_string(),
                }]),
                StageResult::new("Messaging & Events Agent", "raw"),
            ],
            start_time,
            end_time: start_time + chrono::Duration::seconds(42),
        }
    }

    #[test]
    fn test_report_from_result() {
        let report = RunReport::new(&result(), Some(Path::new("out/payments")));

        assert_eq!(report.service, "payments");
        assert_eq!(report.language, "Go");
        assert_eq!(report.stages.len(), 2);
        assert_eq!(report.stages[1].directory, "messaging_and_events_agent");
        assert_eq!(report.stages[0].artifacts[0].bytes, 11);
        assert_eq!(report.artifact_count(), 1);
        assert_eq!(report.duration_secs, 42.0);
    }

    #[test]
    fn test_human_format() {
        let report = RunReport::new(&result(), Some(Path::new("out/payments")));
        let text = OutputFormatter::new(OutputFormat::Human).format(&report).unwrap();

        assert!(text.starts_with("Pipeline completed in 42s for payments (Go)"));
        assert!(text.contains("API Design Agent"));
        assert!(text.contains("    └─ routes.go"));
        assert!(text.contains("out/payments/README.md"));
    }

    #[test]
    fn test_json_format() {
        let report = RunReport::new(&result(), None);
        let text = OutputFormatter::new(OutputFormat::Json).format(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["service"], "payments");
        assert!(value.get("output_dir").is_none());
        assert_eq!(value["stages"][0]["artifacts"][0]["filename"], "routes.go");
    }

    #[test]
    fn test_yaml_format() {
        let report = RunReport::new(&result(), None);
        let text = OutputFormatter::new(OutputFormat::Yaml).format(&report).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();

        assert_eq!(value["service"].as_str(), Some("payments"));
        assert_eq!(value["stages"][1]["stage"].as_str(), Some("Messaging & Events Agent"));
    }
}
