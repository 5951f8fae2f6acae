//! Persists a completed run to disk
//!
//! Layout for a service named `orders`:
//!
//! ```text
//! <root>/orders/README.md
//! <root>/orders/api_design_agent/output.md
//! <root>/orders/api_design_agent/<artifact files>
//! <root>/orders/backend_and_database_agent/...
//! ```

use crate::pipeline::{confine, Artifact, PipelineRunResult, STAGE_LOG_FILE};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Raw stage output, written next to the stage's artifacts
pub const OUTPUT_LOG_FILE: &str = STAGE_LOG_FILE;

/// Per-service summary at the service directory root
pub const SUMMARY_FILE: &str = "README.md";

/// Directory name for a stage: spaces and slashes become `_`, `&` becomes
/// `and`, then everything is lowercased.
pub fn sanitize_stage_name(name: &str) -> String {
    name.replace(' ', "_")
        .replace('&', "and")
        .replace('/', "_")
        .to_lowercase()
}

pub struct ArtifactWriter;

impl ArtifactWriter {
    /// Writes every stage's raw output and artifacts plus the summary.
    ///
    /// Returns the service directory. The first I/O failure aborts the save;
    /// files already written are left in place. The raw output is written
    /// after the artifacts, so `output.md` always holds it.
    pub fn save(result: &PipelineRunResult, root: &Path) -> Result<PathBuf> {
        let service_dir = root.join(&result.descriptor.name);
        fs::create_dir_all(&service_dir).with_context(|| {
            format!("Failed to create output directory {}", service_dir.display())
        })?;

        for stage in &result.stage_results {
            let stage_dir = service_dir.join(sanitize_stage_name(&stage.stage_name));
            fs::create_dir_all(&stage_dir).with_context(|| {
                format!("Failed to create stage directory {}", stage_dir.display())
            })?;

            for artifact in &stage.artifacts {
                Self::write_artifact(&stage_dir, artifact)?;
            }

            let log_path = stage_dir.join(OUTPUT_LOG_FILE);
            fs::write(&log_path, &stage.raw_output)
                .with_context(|| format!("Failed to write {}", log_path.display()))?;

            debug!(
                stage = %stage.stage_name,
                dir = %stage_dir.display(),
                artifacts = stage.artifacts.len(),
                "Saved stage output"
            );
        }

        let summary_path = service_dir.join(SUMMARY_FILE);
        fs::write(&summary_path, render_summary(result))
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;

        info!(dir = %service_dir.display(), "Saved pipeline artifacts");
        Ok(service_dir)
    }

    fn write_artifact(stage_dir: &Path, artifact: &Artifact) -> Result<()> {
        let relative = match confine(&artifact.filename) {
            Some(relative) if relative != Path::new(OUTPUT_LOG_FILE) => relative,
            _ => {
                warn!(
                    filename = %artifact.filename,
                    dir = %stage_dir.display(),
                    "Skipping artifact without a writable filename"
                );
                return Ok(());
            }
        };

        let path = stage_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &artifact.content)
            .with_context(|| format!("Failed to write artifact {}", path.display()))
    }
}

/// Markdown summary of a run: what was built, when, and which files each
/// stage produced.
pub fn render_summary(result: &PipelineRunResult) -> String {
    let descriptor = &result.descriptor;
    let mut out = String::new();

    let _ = writeln!(out, "# {}", descriptor.name);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", descriptor.description);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Language:** {}", descriptor.language);
    let _ = writeln!(
        out,
        "- **Generated:** {}",
        result.end_time.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out, "- **Duration:** {:.1}s", result.duration().as_secs_f64());

    for stage in &result.stage_results {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {}", stage.stage_name);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Directory: `{}/` ({} artifact(s))",
            sanitize_stage_name(&stage.stage_name),
            stage.artifacts.len()
        );
        if !stage.artifacts.is_empty() {
            let _ = writeln!(out);
            for artifact in &stage.artifacts {
                let _ = writeln!(out, "- `{}`", artifact.filename);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{assign_default_names, extract, StageResult};
    use crate::service::ServiceDescriptor;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn artifact(filename: &str, content: &str) -> Artifact {
        Artifact {
            filename: filename.to_string(),
            language: "go".to_string(),
            content: content.to_string(),
        }
    }

    fn run_result(stages: Vec<StageResult>) -> PipelineRunResult {
        let start_time = Utc::now();
        PipelineRunResult {
            descriptor: Arc::new(ServiceDescriptor::new("orders", "Manages orders")),
            stage_results: stages,
            start_time,
            end_time: start_time + ChronoDuration::milliseconds(2500),
        }
    }

    #[test]
    fn test_sanitize_stage_name() {
        assert_eq!(
            sanitize_stage_name("Backend & Database Agent"),
            "backend_and_database_agent"
        );
        assert_eq!(sanitize_stage_name("API Design Agent"), "api_design_agent");
        assert_eq!(sanitize_stage_name("I/O Agent"), "i_o_agent");
        assert_eq!(sanitize_stage_name(""), "");
    }

    #[test]
    fn test_save_writes_layout() {
        let dir = TempDir::new().unwrap();
        let result = run_result(vec![
            StageResult::new("API Design Agent", "raw api text")
                .with_artifacts(vec![artifact("routes.go", "package api")]),
            StageResult::new("Backend & Database Agent", "raw backend text").with_artifacts(vec![
                artifact("migrations/001_up.sql", "CREATE TABLE orders();"),
                artifact("service_1.go", "package svc"),
            ]),
        ]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        assert_eq!(service_dir, dir.path().join("orders"));

        let api_dir = service_dir.join("api_design_agent");
        assert_eq!(
            fs::read_to_string(api_dir.join(OUTPUT_LOG_FILE)).unwrap(),
            "raw api text"
        );
        assert_eq!(
            fs::read_to_string(api_dir.join("routes.go")).unwrap(),
            "package api"
        );

        let backend_dir = service_dir.join("backend_and_database_agent");
        assert_eq!(
            fs::read_to_string(backend_dir.join("migrations/001_up.sql")).unwrap(),
            "CREATE TABLE orders();"
        );
        assert!(backend_dir.join("service_1.go").exists());
        assert!(service_dir.join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_stage_without_artifacts_still_gets_output_log() {
        let dir = TempDir::new().unwrap();
        let result = run_result(vec![StageResult::new("Messaging & Events Agent", "")]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        let stage_dir = service_dir.join("messaging_and_events_agent");

        assert_eq!(fs::read_to_string(stage_dir.join(OUTPUT_LOG_FILE)).unwrap(), "");
        assert_eq!(fs::read_dir(&stage_dir).unwrap().count(), 1);
    }

    #[test]
    fn test_duplicate_filenames_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let result = run_result(vec![StageResult::new("API Design Agent", "raw")
            .with_artifacts(vec![artifact("x.go", "first"), artifact("x.go", "second")])]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(service_dir.join("api_design_agent/x.go")).unwrap(),
            "second"
        );
    }

    #[test]
    fn test_traversal_filename_stays_in_stage_dir() {
        let dir = TempDir::new().unwrap();
        let result = run_result(vec![StageResult::new("API Design Agent", "raw")
            .with_artifacts(vec![artifact("../../escape.go", "package x")])]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        assert!(service_dir.join("api_design_agent/escape.go").exists());
        assert!(!dir.path().join("escape.go").exists());
    }

    #[test]
    fn test_artifact_named_like_the_log_keeps_raw_output() {
        let dir = TempDir::new().unwrap();
        let raw = "Notes first.\n```\n# file: output.md\nhello\n```\n";
        let result = run_result(vec![StageResult::new("API Design Agent", raw)
            .with_artifacts(vec![artifact("output.md", "hello")])]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        assert_eq!(
            fs::read_to_string(service_dir.join("api_design_agent").join(OUTPUT_LOG_FILE))
                .unwrap(),
            raw
        );
    }

    #[test]
    fn test_extracted_log_name_gets_default_name_and_is_saved() {
        let dir = TempDir::new().unwrap();
        let raw = "Notes first.\n```\n# file: output.md\nhello\n```\n";
        let mut artifacts = extract(raw);
        assign_default_names(&mut artifacts, "api");
        let result = run_result(vec![
            StageResult::new("API Design Agent", raw).with_artifacts(artifacts)
        ]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        let stage_dir = service_dir.join("api_design_agent");
        assert_eq!(fs::read_to_string(stage_dir.join(OUTPUT_LOG_FILE)).unwrap(), raw);
        assert!(fs::read_to_string(stage_dir.join("api_1.txt"))
            .unwrap()
            .contains("hello"));
    }

    #[test]
    fn test_directory_like_filenames_do_not_abort_save() {
        let dir = TempDir::new().unwrap();
        let result = run_result(vec![StageResult::new("API Design Agent", "raw")
            .with_artifacts(vec![
                artifact(".", "package dot"),
                artifact("dir/", "package dir"),
                artifact("routes.go", "package api"),
            ])]);

        let service_dir = ArtifactWriter::save(&result, dir.path()).unwrap();
        let stage_dir = service_dir.join("api_design_agent");
        assert!(stage_dir.join("routes.go").exists());
        assert!(!stage_dir.join("dir").exists());
        assert_eq!(fs::read_to_string(stage_dir.join(OUTPUT_LOG_FILE)).unwrap(), "raw");
        assert!(service_dir.join(SUMMARY_FILE).exists());
    }

    #[test]
    fn test_save_fails_when_root_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = ArtifactWriter::save(&run_result(Vec::new()), &blocker).unwrap_err();
        assert!(err.to_string().contains("Failed to create output directory"));
    }

    #[test]
    fn test_render_summary() {
        let result = run_result(vec![
            StageResult::new("API Design Agent", "raw")
                .with_artifacts(vec![artifact("routes.go", ""), artifact("api_1.go", "")]),
            StageResult::new("Testing & Security Agent", "raw"),
        ]);

        let summary = render_summary(&result);
        assert!(summary.starts_with("# orders\n\nManages orders\n"));
        assert!(summary.contains("- **Duration:** 2.5s"));
        assert!(summary.contains("## API Design Agent"));
        assert!(summary.contains("`api_design_agent/` (2 artifact(s))"));
        assert!(summary.contains("- `routes.go`\n- `api_1.go`"));
        assert!(summary.contains("`testing_and_security_agent/` (0 artifact(s))"));
    }
}
