//! Check driver: runs external tools against the modified files and keeps
//! only the findings that matter for this hook invocation.

pub mod finding;
pub mod runner;

pub use finding::{ClassifiedFinding, Finding, FindingPattern, LineStatus, Severity};
pub use runner::{run_check, run_checks, CheckReport, CheckStatus, RunSummary};
