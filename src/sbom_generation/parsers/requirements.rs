//! Line-oriented dependency list parsers.
//!
//! None of these fail: lines that do not look like a dependency are skipped.

use crate::sbom_generation::domain::{Dependency, UNDEFINED_VERSION};
use regex::Regex;
use std::sync::LazyLock;

static REQUIREMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)(?:\[[^\]]*\])?\s*([=~<>!]+)\s*(.+)$")
        .expect("requirement pattern must compile")
});

static BARE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)(?:\[[^\]]*\])?$").expect("name pattern must compile")
});

static COLON_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)\s*:\s*(.*)$").expect("colon pattern must compile")
});

static EXACT_PIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]+)==(\S+)").expect("pin pattern must compile")
});

/// Parses a pip-style requirements file.
///
/// `name==1.0` yields version `1.0`; any other operator stays in the version
/// (`requests>=2.0` yields `>=2.0`). Extras, inline comments and environment
/// markers are stripped. A line with no operator becomes a name-only record.
/// Option lines (`-r other.txt`, `-e .`) are skipped.
pub fn parse_pinned_requirements(content: &str, source: &str) -> Vec<Dependency> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| parse_requirement_line(line, source))
        .collect()
}

fn parse_requirement_line(line: &str, source: &str) -> Option<Dependency> {
    if let Some(caps) = REQUIREMENT_LINE.captures(line) {
        let name = &caps[1];
        let operator = &caps[2];
        let spec = strip_trailing_annotations(&caps[3]);

        let version = if spec.is_empty() {
            None
        } else if operator == "==" {
            Some(spec.to_string())
        } else {
            Some(format!("{}{}", operator, spec))
        };
        return Dependency::new(name, version, source).ok();
    }

    let without_comment = strip_trailing_annotations(line);
    BARE_NAME
        .captures(without_comment)
        .and_then(|caps| Dependency::new(&caps[1], None, source).ok())
}

/// Drops `# comment` and `; marker` tails.
fn strip_trailing_annotations(spec: &str) -> &str {
    let spec = spec.split('#').next().unwrap_or_default();
    spec.split(';').next().unwrap_or_default().trim()
}

/// Parses `name: version` side-file lines.
///
/// The version is the first whitespace-delimited token after the colon, or
/// `undefined` when nothing follows.
pub fn parse_colon_entries(content: &str, source: &str) -> Vec<Dependency> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|line| COLON_LINE.captures(line))
        .filter_map(|caps| {
            let version = caps[2]
                .split_whitespace()
                .next()
                .unwrap_or(UNDEFINED_VERSION)
                .to_string();
            Dependency::new(&caps[1], Some(version), source).ok()
        })
        .collect()
}

/// Strict `name==version` pins, as used inside meta-package requirement templates.
pub fn parse_exact_pins(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| EXACT_PIN.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}
