use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::error::HooklineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Whether a finding sits on a line the hook invocation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    Modified,
    Unmodified,
}

/// One problem reported by a check tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: PathBuf,
    pub line: u32,
    pub severity: Severity,
    pub message: String,
}

/// A [`Finding`] tagged with whether it is on a modified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedFinding {
    #[serde(flatten)]
    pub finding: Finding,
    pub status: LineStatus,
}

/// Compiled form of a check's output pattern.
#[derive(Debug, Clone)]
pub struct FindingPattern {
    regex: Regex,
    warning_types: Vec<String>,
}

impl FindingPattern {
    /// Compiles `pattern`, which must have named groups `file` and `line`.
    ///
    /// # Errors
    ///
    /// Returns [`HooklineError::Regex`] for an invalid expression and
    /// [`HooklineError::Other`] when a required group is missing.
    pub fn new(pattern: &str, warning_types: &[String]) -> Result<Self, HooklineError> {
        let regex = Regex::new(pattern)?;
        for group in ["file", "line"] {
            if !regex.capture_names().flatten().any(|name| name == group) {
                return Err(HooklineError::Other(format!(
                    "Pattern `{pattern}` has no `{group}` group"
                )));
            }
        }
        Ok(Self {
            regex,
            warning_types: warning_types.to_vec(),
        })
    }

    /// Extracts findings from tool output, one per matching line. Relative
    /// file names are resolved against `root`.
    pub fn extract(&self, output: &str, root: &Path) -> Vec<Finding> {
        output
            .lines()
            .filter_map(|text| {
                let caps = self.regex.captures(text)?;
                let file = caps.name("file")?.as_str().trim();
                let line = caps.name("line")?.as_str().parse().ok()?;

                let severity = match caps.name("type") {
                    Some(kind)
                        if self
                            .warning_types
                            .iter()
                            .any(|w| kind.as_str().starts_with(w.as_str())) =>
                    {
                        Severity::Warning
                    }
                    _ => Severity::Error,
                };

                let file = Path::new(file);
                Some(Finding {
                    file: if file.is_absolute() {
                        file.to_path_buf()
                    } else {
                        root.join(file)
                    },
                    line,
                    severity,
                    message: text.trim().to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PEP8: &str = r"^(?P<file>[^:]+):(?P<line>\d+):\d+:\s(?P<type>E|W)";

    #[test]
    fn extracts_errors_and_warnings() {
        let pattern = FindingPattern::new(PEP8, &["W".to_string()]).unwrap();
        let output = "\
path/to/file.py:88:5: E301 expected 1 blank line, found 0
path/to/file.py:90:1: W391 blank line at end of file
some unrelated noise
";
        let findings = pattern.extract(output, Path::new("/repo"));
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].file, PathBuf::from("/repo/path/to/file.py"));
        assert_eq!(findings[0].line, 88);
        assert_eq!(findings[0].severity, Severity::Error);
        assert_eq!(findings[1].severity, Severity::Warning);
        assert!(findings[1].message.contains("W391"));
    }

    #[test]
    fn missing_type_group_means_error() {
        let pattern =
            FindingPattern::new(r"^(?P<file>[^:]+):(?P<line>\d+):", &["W".to_string()]).unwrap();
        let findings = pattern.extract("/abs/a.rs:3: boom", Path::new("/repo"));
        assert_eq!(findings[0].file, PathBuf::from("/abs/a.rs"));
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn pattern_requires_file_and_line_groups() {
        assert!(FindingPattern::new(r"^(?P<file>[^:]+):", &[]).is_err());
        assert!(matches!(
            FindingPattern::new(r"(unclosed", &[]),
            Err(HooklineError::Regex(_))
        ));
    }
}
