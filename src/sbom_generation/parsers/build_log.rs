//! Configure-log scraping: compilers, platform, release line and the
//! package-filtering section.

use crate::sbom_generation::domain::{BuildInfo, ReleaseInfo};
use regex::Regex;
use std::sync::LazyLock;

/// 1-based line that carries `Using platform name:` in a standard configure log.
pub const DEFAULT_PLATFORM_LINE: usize = 25;

static C_COMPILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"The C compiler identification is (.+)").expect("C compiler pattern must compile")
});

static CXX_COMPILER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"The CXX compiler identification is (.+)")
        .expect("CXX compiler pattern must compile")
});

static PLATFORM_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Using platform name: (.+)").expect("platform pattern must compile")
});

static RELEASE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9]+) release "([^"]+)" for platform: (.+)"#)
        .expect("release pattern must compile")
});

static INCLUDED_PACKAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--\s+\+\s+External/(\S+)").expect("included package pattern must compile")
});

static EXCLUDED_PACKAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--\s+-").expect("excluded package pattern must compile"));

const PACKAGE_SECTION_MARKER: &str = "Package filtering rules read:";
const CONFIGURING_MARKER: &str = "-- Configuring";

/// Where the `Using platform name:` line is looked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformLine {
    /// Only the given 1-based line is inspected
    Fixed(usize),
    /// The first matching line anywhere in the log
    Anywhere,
}

impl Default for PlatformLine {
    fn default() -> Self {
        PlatformLine::Fixed(DEFAULT_PLATFORM_LINE)
    }
}

/// Parses a configure log. Every field is optional and independently extracted.
pub fn parse_build_log(content: &str, platform_line: PlatformLine) -> BuildInfo {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();

    let c_compiler = lines.first().and_then(|l| capture(&C_COMPILER, l));
    let cxx_compiler = lines.get(1).and_then(|l| capture(&CXX_COMPILER, l));

    let platform = match platform_line {
        PlatformLine::Fixed(n) => n
            .checked_sub(1)
            .and_then(|idx| lines.get(idx))
            .and_then(|l| capture(&PLATFORM_NAME, l)),
        PlatformLine::Anywhere => lines.iter().find_map(|l| capture(&PLATFORM_NAME, l)),
    };

    let release = lines.iter().find_map(|l| parse_release_line(l));

    BuildInfo {
        c_compiler,
        cxx_compiler,
        platform,
        release,
        packages: parse_package_section(&lines),
    }
}

/// Parses `<product> release "<version>" for platform: <platform>`.
///
/// A `<product>_` prefix on the quoted version is dropped, so
/// `LCG release "LCG_104d_ATLAS_8"` yields version `104d_ATLAS_8`.
fn parse_release_line(line: &str) -> Option<ReleaseInfo> {
    let caps = RELEASE_LINE.captures(line)?;
    let product = caps[1].to_string();
    let quoted = caps[2].trim();
    let version = quoted
        .strip_prefix(&format!("{}_", product))
        .unwrap_or(quoted)
        .to_string();
    Some(ReleaseInfo {
        product,
        version,
        platform: caps[3].trim().to_string(),
    })
}

fn parse_package_section(lines: &[&str]) -> Vec<String> {
    let Some(start) = lines.iter().position(|l| l.contains(PACKAGE_SECTION_MARKER)) else {
        return Vec::new();
    };

    let mut packages = Vec::new();
    for line in &lines[start + 1..] {
        if line.starts_with(CONFIGURING_MARKER) || (line.is_empty() && !packages.is_empty()) {
            break;
        }
        if let Some(name) = capture(&INCLUDED_PACKAGE, line) {
            packages.push(name);
        } else if EXCLUDED_PACKAGE.is_match(line) {
            break;
        }
    }
    packages
}

fn capture(re: &Regex, line: &str) -> Option<String> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
