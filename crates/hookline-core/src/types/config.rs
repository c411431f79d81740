use serde::{Deserialize, Serialize};

use crate::types::event::HookEvent;

/// How the commit `HEAD` pointed at before a merge is recovered.
///
/// Shallow or freshly cloned repositories may have no reflog, so the choice
/// is left to configuration. Each option falls back to `HEAD` when nothing
/// better resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreMergeRef {
    /// `ORIG_HEAD`, then `HEAD@{1}`.
    #[default]
    OrigHead,
    /// `HEAD@{1}` only.
    Reflog,
}

impl PreMergeRef {
    /// Candidate refs in the order they are tried.
    pub fn candidates(&self) -> &'static [&'static str] {
        match self {
            PreMergeRef::OrigHead => &["ORIG_HEAD", "HEAD@{1}", "HEAD"],
            PreMergeRef::Reflog => &["HEAD@{1}", "HEAD"],
        }
    }
}

/// An external tool whose findings are filtered to modified lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDefinition {
    pub name: String,
    /// Program and leading arguments; the applicable files are appended.
    pub command: Vec<String>,
    /// Regex with named groups `file` and `line`, and optionally `type`.
    pub pattern: String,
    /// Values of the `type` group that mark a finding as a warning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warning_types: Vec<String>,
    /// File name suffixes this check applies to. Empty means every file.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    /// Hook events the check runs on. Empty means every event.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<HookEvent>,
}

impl CheckDefinition {
    pub fn applies_to_event(&self, event: HookEvent) -> bool {
        self.events.is_empty() || self.events.contains(&event)
    }

    pub fn applies_to_file(&self, file_name: &str) -> bool {
        self.include.is_empty() || self.include.iter().any(|suffix| file_name.ends_with(suffix))
    }
}

/// The `.hookline.json` root document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookConfig {
    #[serde(default)]
    pub pre_merge_ref: PreMergeRef,
    #[serde(default)]
    pub checks: Vec<CheckDefinition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_config_json() {
        let json = r#"{
            "preMergeRef": "reflog",
            "checks": [
                {
                    "name": "pep8",
                    "command": ["pep8"],
                    "pattern": "^(?P<file>[^:]+):(?P<line>\\d+):\\d+:\\s(?P<type>E|W)",
                    "warningTypes": ["W"],
                    "include": [".py"],
                    "events": ["pre-commit", "run-all"]
                }
            ]
        }"#;
        let config: HookConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pre_merge_ref, PreMergeRef::Reflog);
        assert_eq!(config.checks.len(), 1);
        let check = &config.checks[0];
        assert_eq!(check.warning_types, vec!["W"]);
        assert!(check.applies_to_event(HookEvent::RunAll));
        assert!(!check.applies_to_event(HookEvent::PostMerge));
        assert!(check.applies_to_file("src/app.py"));
        assert!(!check.applies_to_file("README.md"));
    }

    #[test]
    fn defaults_when_fields_missing() {
        let config: HookConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.pre_merge_ref, PreMergeRef::OrigHead);
        assert!(config.checks.is_empty());
    }

    #[test]
    fn empty_filters_match_everything() {
        let check: CheckDefinition = serde_json::from_str(
            r#"{"name": "any", "command": ["true"], "pattern": "x"}"#,
        )
        .unwrap();
        assert!(check.applies_to_event(HookEvent::PrePush));
        assert!(check.applies_to_file("anything.rs"));
    }

    #[test]
    fn orig_head_tries_reflog_before_head() {
        assert_eq!(
            PreMergeRef::OrigHead.candidates(),
            &["ORIG_HEAD", "HEAD@{1}", "HEAD"]
        );
        assert_eq!(PreMergeRef::Reflog.candidates(), &["HEAD@{1}", "HEAD"]);
    }
}
