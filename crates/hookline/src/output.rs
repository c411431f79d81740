use colored::*;
use hookline_core::check::{CheckReport, CheckStatus, LineStatus, RunSummary, Severity};
use serde::Serialize;

/// Output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Quiet,
}

/// Accumulated JSON result entry.
#[derive(Debug, Serialize, Clone)]
pub struct JsonResultEntry {
    #[serde(rename = "type")]
    pub result_type: String,
    pub message: String,
}

/// Accumulated JSON output.
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub results: Vec<JsonResultEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Reporter handles all output formatting.
pub struct Reporter {
    mode: OutputMode,
    json_results: Vec<JsonResultEntry>,
    json_data: Option<serde_json::Value>,
}

impl Reporter {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            json_results: Vec::new(),
            json_data: None,
        }
    }

    fn push_json(&mut self, result_type: &str, message: &str) {
        self.json_results.push(JsonResultEntry {
            result_type: result_type.to_string(),
            message: message.to_string(),
        });
    }

    pub fn error(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human | OutputMode::Quiet => {
                eprintln!("{} {}", "ERROR:".red(), message);
            }
            OutputMode::Json => self.push_json("error", message),
        }
    }

    pub fn warning(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                eprintln!("{} {}", "WARNING:".yellow(), message);
            }
            OutputMode::Json => self.push_json("warning", message),
            OutputMode::Quiet => {}
        }
    }

    pub fn success(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                println!("{} {}", "✓".green(), message);
            }
            OutputMode::Json => self.push_json("success", message),
            OutputMode::Quiet => {}
        }
    }

    pub fn info(&mut self, message: &str) {
        match self.mode {
            OutputMode::Human => {
                println!("{} {}", "INFO:".blue(), message);
            }
            OutputMode::Json => self.push_json("info", message),
            OutputMode::Quiet => {}
        }
    }

    pub fn section(&mut self, title: &str) {
        if self.mode == OutputMode::Human {
            println!("{}", format!("=== {title} ===").cyan());
        }
    }

    /// Prints one plain line of result data. Shown even in quiet mode, since
    /// it is the command's answer rather than commentary.
    pub fn item(&mut self, line: &str) {
        if self.mode != OutputMode::Json {
            println!("{line}");
        }
    }

    /// Structured payload emitted under `data` in JSON mode.
    pub fn data<T: Serialize>(&mut self, value: &T) {
        if self.mode == OutputMode::Json {
            match serde_json::to_value(value) {
                Ok(v) => self.json_data = Some(v),
                Err(e) => self.push_json("error", &format!("Cannot serialize output: {e}")),
            }
        }
    }

    pub fn report_check(&mut self, report: &CheckReport) {
        let label = format!("{}: {}", report.name, status_label(report.status));
        match report.status {
            CheckStatus::Pass => self.success(&label),
            CheckStatus::Warn => self.warning(&label),
            CheckStatus::Fail | CheckStatus::Error => self.error(&label),
        }

        if let Some(message) = &report.message {
            if report.status == CheckStatus::Error {
                self.error(message);
            } else {
                self.info(message);
            }
        }

        for classified in &report.findings {
            let finding = &classified.finding;
            let where_ = match classified.status {
                LineStatus::Modified => "",
                LineStatus::Unmodified => " (unmodified line)",
            };
            let msg = format!("{}{where_}", finding.message);
            match (classified.status, finding.severity) {
                (LineStatus::Modified, Severity::Error) => self.error(&msg),
                _ => self.warning(&msg),
            }
        }
    }

    pub fn report_summary(&mut self, summary: &RunSummary) {
        for report in &summary.reports {
            self.report_check(report);
        }

        self.section("Summary");
        self.info(&format!(
            "{} check(s): {} passed, {} warned, {} failed, {} errored",
            summary.reports.len(),
            summary.count(CheckStatus::Pass),
            summary.count(CheckStatus::Warn),
            summary.count(CheckStatus::Fail),
            summary.count(CheckStatus::Error),
        ));
        self.data(summary);
    }

    pub fn finish(&self) {
        if self.mode == OutputMode::Json {
            let output = JsonOutput {
                results: self.json_results.clone(),
                data: self.json_data.clone(),
            };
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                println!("{json}");
            }
        }
    }
}

fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "passed",
        CheckStatus::Warn => "passed with warnings",
        CheckStatus::Fail => "failed",
        CheckStatus::Error => "could not run",
    }
}
