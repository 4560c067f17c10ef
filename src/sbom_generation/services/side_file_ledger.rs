use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static INTERPRETER_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([Pp]ython)\s*[:\s]*([0-9]+\.[0-9]+(?:\.[0-9]+)?)")
        .expect("interpreter pattern must compile")
});

/// Append-only `name: version` side file, deduplicated by exact line text.
///
/// Seeded with the file's current content; `record` queues only lines not
/// already present, and `take_pending` hands them over for a single append.
#[derive(Debug, Default)]
pub struct SideFileLedger {
    known: HashSet<String>,
    pending: Vec<String>,
}

impl SideFileLedger {
    pub fn new(existing: Option<&str>) -> Self {
        let known = existing
            .unwrap_or_default()
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Self {
            known,
            pending: Vec::new(),
        }
    }

    /// Queues `line` unless an identical line exists. Returns true if queued.
    pub fn record(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || !self.known.insert(line.to_string()) {
            return false;
        }
        self.pending.push(line.to_string());
        true
    }

    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }
}

/// The `Python: <version>` line to copy into `target`, if `source` has one
/// and `target` does not already carry it.
pub fn interpreter_entry(source: &str, target: &str) -> Option<String> {
    let version = source
        .lines()
        .map(str::trim)
        .filter(|l| l.to_lowercase().starts_with("python"))
        .find_map(|l| INTERPRETER_VERSION.captures(l).map(|c| c[2].to_string()))?;

    let line = format!("Python: {}", version);
    if target.lines().any(|l| l.trim() == line) {
        None
    } else {
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deduplicates_against_existing() {
        let mut ledger = SideFileLedger::new(Some("Boost: 1.82.0\nROOT: 6.30.06\n"));

        assert!(!ledger.record("Boost: 1.82.0"));
        assert!(ledger.record("Boost: 1.84.0"));
        assert!(ledger.record("lwtnn: 2.13"));
        assert!(!ledger.record("lwtnn: 2.13"));
        assert!(!ledger.record("   "));

        assert_eq!(ledger.take_pending(), vec!["Boost: 1.84.0", "lwtnn: 2.13"]);
        assert!(ledger.take_pending().is_empty());
        assert!(!ledger.record("lwtnn: 2.13"));
    }

    #[test]
    fn test_interpreter_entry() {
        let py = "numpy: 1.26.4\nPython: 3.11.9\n";
        assert_eq!(interpreter_entry(py, "Boost: 1.82.0"), Some("Python: 3.11.9".to_string()));
        assert_eq!(interpreter_entry(py, "Python: 3.11.9\n"), None);
        assert_eq!(interpreter_entry("python 3.9", ""), Some("Python: 3.9".to_string()));
        assert_eq!(interpreter_entry("numpy: 1.26.4", ""), None);
    }
}
