//! Structured description of the microservice to generate

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("Failed to read service descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse service descriptor {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid service descriptor: {0}")]
    Invalid(String),

    #[error("Unknown preset: {0}. Valid options: inventory, payments, notifications")]
    UnknownPreset(String),
}

/// The target system every stage tailors its output to.
///
/// Sequence fields are rendered in the order given; any of them may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub entities: Vec<String>,
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default)]
    pub integrations: Vec<String>,
    #[serde(default)]
    pub extra_requirements: Vec<String>,
}

fn default_language() -> String {
    "Go".to_string()
}

impl ServiceDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: default_language(),
            entities: Vec::new(),
            operations: Vec::new(),
            integrations: Vec::new(),
            extra_requirements: Vec::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_operations<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operations = operations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_integrations<I, S>(mut self, integrations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.integrations = integrations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra_requirements<I, S>(mut self, requirements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_requirements = requirements.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the fields that later become filesystem paths.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DescriptorError::Invalid(
                "service name must not be empty".to_string(),
            ));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(DescriptorError::Invalid(format!(
                "service name '{}' must be a single path segment",
                self.name
            )));
        }
        Ok(())
    }

    /// Loads a descriptor from a YAML, TOML or JSON file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, DescriptorError> {
        let raw = std::fs::read_to_string(path).map_err(|source| DescriptorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |message: String| DescriptorError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let descriptor: ServiceDescriptor = match extension.as_str() {
            "toml" => toml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
            "json" => serde_json::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
            _ => serde_yaml::from_str(&raw).map_err(|e| parse_error(e.to_string()))?,
        };

        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Renders the descriptor as the base task text shared by every stage.
    ///
    /// Output depends only on the field values, so equal descriptors always
    /// render identically. Empty sections are left out.
    pub fn render_prompt(&self) -> String {
        let mut p = String::new();
        let _ = write!(p, "Microservice Name: {}\n\n", self.name);
        let _ = write!(p, "Description:\n{}\n\n", self.description);
        let _ = write!(p, "Language: {}\n\n", self.language);

        render_section(&mut p, "Core Domain Entities", &self.entities);
        render_section(&mut p, "Key Business Operations", &self.operations);
        render_section(&mut p, "External Integrations", &self.integrations);
        render_section(&mut p, "Additional Requirements", &self.extra_requirements);

        p
    }
}

fn render_section(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}:", title);
    for item in items {
        let _ = writeln!(out, "  - {}", item);
    }
    out.push('\n');
}
