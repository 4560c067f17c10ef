//! Reading back the build-information table of a stored narrative report.

use std::collections::BTreeMap;

pub const BUILD_INFO_HEADING: &str = "## Build Information";

/// Returns the `key -> value` rows of the build-information table, or an
/// empty map when the report has no such section.
pub fn parse_build_info_section(markdown: &str) -> BTreeMap<String, String> {
    let mut rows = BTreeMap::new();
    let mut in_section = false;
    let mut seen_table = false;

    for line in markdown.lines().map(str::trim) {
        if line.starts_with("## ") {
            if in_section {
                break;
            }
            in_section = line == BUILD_INFO_HEADING;
            continue;
        }
        if !in_section {
            continue;
        }
        if !line.starts_with('|') {
            if seen_table {
                break;
            }
            continue;
        }
        seen_table = true;

        let cells = split_row(line);
        if cells.len() < 2 || is_separator(&cells) || cells[0] == "Component" {
            continue;
        }
        rows.insert(cells[0].clone(), cells[1].clone());
    }
    rows
}

/// Splits a table row on unescaped pipes and unescapes `\|` in cells.
fn split_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_separator(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}
