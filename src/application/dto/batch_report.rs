use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Result of one project inside a batch run
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub project: String,
    /// Outcome text, or the error message when the run failed
    pub result: std::result::Result<String, String>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
    pub log_path: PathBuf,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.items.iter().filter(|i| i.result.is_err()).count()
    }
}

/// Status of the most recent batch run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatus {
    pub has_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    pub last_lines: Vec<String>,
    pub message: String,
}
