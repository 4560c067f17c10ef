mod extraction_rules;
mod name_aliases;

pub use extraction_rules::{ExtractedVersion, ExtractionRules, MatchStrategy};
pub use name_aliases::NameAliases;
