//! Default filenames for artifacts, and confinement of hinted ones

use super::extractor::Artifact;
use std::path::{Component, Path, PathBuf};

/// Name of the raw stage output saved next to the stage's artifacts
pub const STAGE_LOG_FILE: &str = "output.md";

/// Maps a fence language tag to a file extension (without the dot).
pub fn extension_for(language: &str) -> &'static str {
    match language {
        "go" => "go",
        "sql" => "sql",
        "yaml" | "yml" => "yaml",
        "json" => "json",
        _ => "txt",
    }
}

/// Relative path, inside a stage directory, that a filename hint writes to.
///
/// Plain relative paths are kept so nested layouts like
/// `migrations/001_up.sql` survive. Anything absolute or containing `..` is
/// reduced to its final component. Returns `None` when the hint names no
/// file at all (`""`, `.`, `dir/`).
pub fn confine(filename: &str) -> Option<PathBuf> {
    if filename.ends_with(['/', '\\']) {
        return None;
    }

    let path = Path::new(filename);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let confined: PathBuf = if escapes {
        PathBuf::from(parts.last()?)
    } else {
        parts.iter().collect()
    };

    if confined.as_os_str().is_empty() {
        None
    } else {
        Some(confined)
    }
}

/// A hint is usable when it names a file and does not land on the stage log.
fn is_usable_hint(filename: &str) -> bool {
    confine(filename).is_some_and(|path| path != Path::new(STAGE_LOG_FILE))
}

/// Names every hintless artifact `<family>_<n>.<ext>`.
///
/// Artifacts whose hint names no file, or would overwrite the stage log,
/// count as hintless. `n` counts only those artifacts, starting at 1, in
/// extraction order. Usable hints are left untouched.
pub fn assign_default_names(artifacts: &mut [Artifact], family: &str) {
    let mut n = 0;
    for artifact in artifacts
        .iter_mut()
        .filter(|a| !is_usable_hint(&a.filename))
    {
        n += 1;
        artifact.filename = format!("{}_{}.{}", family, n, extension_for(&artifact.language));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    fn artifact(filename: &str, language: &str) -> Artifact {
        Artifact {
            filename: filename.to_string(),
            language: language.to_string(),
            content: String::new(),
        }
    }

    #[parameterized(
        go = { "go", "go" },
        sql = { "sql", "sql" },
        yaml = { "yaml", "yaml" },
        yml = { "yml", "yaml" },
        json = { "json", "json" },
        empty = { "", "txt" },
        makefile = { "makefile", "txt" },
        uppercase_go = { "Go", "txt" },
    )]
    fn test_extension_for(language: &str, expected: &str) {
        assert_eq!(extension_for(language), expected);
    }

    #[test]
    fn test_sequential_default_names() {
        let mut artifacts = vec![artifact("", "go"), artifact("", "go")];
        assign_default_names(&mut artifacts, "service");

        assert_eq!(artifacts[0].filename, "service_1.go");
        assert_eq!(artifacts[1].filename, "service_2.go");
    }

    #[test]
    fn test_hinted_artifacts_do_not_advance_counter() {
        let mut artifacts = vec![
            artifact("main.go", "go"),
            artifact("", "sql"),
            artifact("handler.go", "go"),
            artifact("", ""),
        ];
        assign_default_names(&mut artifacts, "api");

        let names: Vec<_> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["main.go", "api_1.sql", "handler.go", "api_2.txt"]);
    }

    #[test]
    fn test_confine() {
        assert_eq!(confine("main.go"), Some(PathBuf::from("main.go")));
        assert_eq!(
            confine("migrations/001_up.sql"),
            Some(PathBuf::from("migrations/001_up.sql"))
        );
        assert_eq!(confine("./main.go"), Some(PathBuf::from("main.go")));
        assert_eq!(confine("../../etc/passwd"), Some(PathBuf::from("passwd")));
        assert_eq!(confine("/tmp/evil.go"), Some(PathBuf::from("evil.go")));
        assert_eq!(confine(""), None);
        assert_eq!(confine("."), None);
        assert_eq!(confine("./"), None);
        assert_eq!(confine("dir/"), None);
        assert_eq!(confine(".."), None);
    }

    #[test]
    fn test_hints_without_a_file_get_default_names() {
        let mut artifacts = vec![
            artifact(".", "go"),
            artifact("handler.go", "go"),
            artifact("migrations/", "sql"),
        ];
        assign_default_names(&mut artifacts, "service");

        let names: Vec<_> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["service_1.go", "handler.go", "service_2.sql"]);
    }

    #[test]
    fn test_stage_log_name_is_not_a_usable_hint() {
        let mut artifacts = vec![
            artifact("output.md", ""),
            artifact("./output.md", "md"),
            artifact("../output.md", ""),
            artifact("docs/output.md", ""),
        ];
        assign_default_names(&mut artifacts, "api");

        let names: Vec<_> = artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["api_1.txt", "api_2.txt", "api_3.txt", "docs/output.md"]
        );
    }

    #[test]
    fn test_no_artifacts() {
        let mut artifacts: Vec<Artifact> = Vec::new();
        assign_default_names(&mut artifacts, "test");
        assert!(artifacts.is_empty());
    }
}
