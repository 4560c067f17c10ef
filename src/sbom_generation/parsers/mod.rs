//! Text parsers for the heterogeneous dependency inputs.
//!
//! Parsers are pure: they take text (and sometimes paths for provenance) and
//! never touch the filesystem or fail on malformed input.

pub mod build_log;
pub mod build_manifest;
pub mod narrative;
pub mod package_filters;
pub mod package_index;
pub mod requirements;

pub use build_log::{parse_build_log, PlatformLine, DEFAULT_PLATFORM_LINE};
pub use build_manifest::{
    builtin_meta_packages, manifest_candidates, parse_find_package_calls, parse_source_tarballs,
    DiscoveredEntry, EntryOrigin, MetaPackage, MetaPackageKind, MANIFEST_FILE_NAME,
};
pub use narrative::{parse_build_info_section, BUILD_INFO_HEADING};
pub use package_filters::{fallback_packages, parse_package_filters};
pub use package_index::{
    index_url, parse_package_index, IndexParseResult, PairingStrategy, DEFAULT_TABLE_ID,
    DEFAULT_URL_TEMPLATE,
};
pub use requirements::{parse_colon_entries, parse_exact_pins, parse_pinned_requirements};
