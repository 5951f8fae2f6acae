//! Fenced code block extraction
//!
//! Generated text is scanned line by line for markdown fences. Every closed
//! block becomes one [`Artifact`]; a block that is never closed is dropped.
//! Malformed input is never an error.

use serde::{Deserialize, Serialize};

pub const FENCE: &str = "```";

const FILENAME_HINTS: [&str; 2] = ["// file:", "# file:"];

/// One file-like unit extracted from generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Empty when the block carried no filename hint
    pub filename: String,
    /// Tag after the opening fence, verbatim
    pub language: String,
    pub content: String,
}

enum ScanState<'a> {
    Outside,
    Inside {
        language: &'a str,
        filename: String,
        lines: Vec<&'a str>,
    },
}

/// Extracts every closed fenced block from `text`, in order of appearance.
pub fn extract(text: &str) -> Vec<Artifact> {
    let mut artifacts = Vec::new();
    let mut state = ScanState::Outside;

    for line in text.split('\n') {
        state = match state {
            ScanState::Outside => match line.strip_prefix(FENCE) {
                Some(language) => ScanState::Inside {
                    language,
                    filename: String::new(),
                    lines: Vec::new(),
                },
                None => ScanState::Outside,
            },
            ScanState::Inside {
                language,
                filename,
                lines,
            } if line == FENCE => {
                artifacts.push(Artifact {
                    filename,
                    language: language.to_string(),
                    content: lines.join("\n"),
                });
                ScanState::Outside
            }
            ScanState::Inside {
                language,
                mut filename,
                mut lines,
            } => {
                if let Some(hint) = filename_hint(line) {
                    filename = hint;
                }
                lines.push(line);
                ScanState::Inside {
                    language,
                    filename,
                    lines,
                }
            }
        };
    }

    artifacts
}

fn filename_hint(line: &str) -> Option<String> {
    if !FILENAME_HINTS.iter().any(|prefix| line.starts_with(prefix)) {
        return None;
    }
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
}
