use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// The most recent batch-run log.
#[derive(Debug, Clone)]
pub struct RunLogSnapshot {
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    /// Last lines of the log, oldest first
    pub tail: Vec<String>,
}

/// RunLog port for batch-run transcripts
pub trait RunLog {
    /// Writes a new log holding `lines` and returns its location
    fn record(&self, lines: &[String]) -> Result<PathBuf>;

    /// The newest log with at most `tail_lines` trailing lines, `None` if no run has been logged
    fn latest(&self, tail_lines: usize) -> Result<Option<RunLogSnapshot>>;
}
