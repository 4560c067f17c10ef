//! Parsing of the remote release-package index page.
//!
//! The page is scraped with regular expressions rather than a DOM parser:
//! only one table is of interest and its markup is regular.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const DEFAULT_URL_TEMPLATE: &str = "https://lcginfo.cern.ch/release_packages/{release}/{platform}/";
pub const DEFAULT_TABLE_ID: &str = "release";

static ROW_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?is)<tr[^>]*>\s*<td[^>]*>\s*<a[^>]*href="/pkg/([^/]+)/"[^>]*>\s*([^<]+?)\s*</a>\s*</td>"#,
        r#"\s*<td[^>]*>.*?<a[^>]*href="/pkgver/[^/]+/([^/]+)/"[^>]*>\s*([^<]+?)\s*</a>.*?</td>\s*</tr>"#,
    ))
    .expect("row pattern must compile")
});

static NAME_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]*href="/pkg/([^/]+)/"[^>]*>([^<]+)</a>"#)
        .expect("name link pattern must compile")
});

static VERSION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]*href="/pkgver/[^/]+/([^/]+)/"[^>]*>([^<]+)</a>"#)
        .expect("version link pattern must compile")
});

/// Which extraction produced the packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingStrategy {
    /// Name and version links taken from the same table row
    RowPairs,
    /// All name links zipped with all version links by position
    Positional,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexParseResult {
    /// Package name to version; a later row for the same name wins
    pub packages: BTreeMap<String, String>,
    pub table_found: bool,
    pub strategy: Option<PairingStrategy>,
}

/// Builds the index URL, percent-encoding release and platform.
pub fn index_url(template: &str, release: &str, platform: &str) -> String {
    template
        .replace("{release}", &urlencoding::encode(release))
        .replace("{platform}", &urlencoding::encode(platform))
}

/// Extracts `name -> version` pairs from the table whose `id` is `table_id`.
///
/// Row-wise pairing is tried first. When it yields nothing, every name link is
/// paired with the version link at the same position. That fallback silently
/// mis-pairs if the table has a row without a version link.
pub fn parse_package_index(html: &str, table_id: &str) -> IndexParseResult {
    let Some(table) = find_table(html, table_id) else {
        return IndexParseResult::default();
    };

    let mut packages = BTreeMap::new();
    for caps in ROW_PAIR.captures_iter(&table) {
        let name = prefer_text(&caps[2], &caps[1]);
        let version = prefer_text(&caps[4], &caps[3]);
        if !name.is_empty() && !version.is_empty() {
            packages.insert(name, version);
        }
    }
    if !packages.is_empty() {
        return IndexParseResult {
            packages,
            table_found: true,
            strategy: Some(PairingStrategy::RowPairs),
        };
    }

    let names = NAME_LINK.captures_iter(&table);
    let versions = VERSION_LINK.captures_iter(&table);
    for (name_caps, version_caps) in names.zip(versions) {
        let name = prefer_text(&name_caps[2], &name_caps[1]);
        let version = prefer_text(&version_caps[2], &version_caps[1]);
        if !name.is_empty() && !version.is_empty() {
            packages.insert(name, version);
        }
    }

    let strategy = (!packages.is_empty()).then_some(PairingStrategy::Positional);
    IndexParseResult {
        packages,
        table_found: true,
        strategy,
    }
}

fn find_table(html: &str, table_id: &str) -> Option<String> {
    let pattern = format!(
        r#"(?s)<table[^>]*id="{}"[^>]*>(.*?)</table>"#,
        regex::escape(table_id)
    );
    // table_id is escaped, so the pattern always compiles
    let re = Regex::new(&pattern).ok()?;
    re.captures(html).map(|caps| caps[1].to_string())
}

fn prefer_text(text: &str, href: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        href.trim().to_string()
    } else {
        text.to_string()
    }
}
