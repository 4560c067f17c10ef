use crate::sbom_generation::policies::NameAliases;
use std::collections::BTreeMap;

/// How an expected package name was found among discovered names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    CaseInsensitive,
    Alias,
}

/// Reconciler service comparing expected package names with what a source reported.
pub struct Reconciler;

impl Reconciler {
    /// Finds the discovered name matching `expected`.
    ///
    /// Priority: exact, then case-insensitive, then each alias (exact before
    /// case-insensitive). Among several case-insensitive candidates the
    /// lexicographically smallest wins.
    pub fn match_name<'a, V>(
        expected: &str,
        discovered: &'a BTreeMap<String, V>,
        aliases: &NameAliases,
    ) -> Option<(&'a str, MatchKind)> {
        if let Some((name, _)) = discovered.get_key_value(expected) {
            return Some((name.as_str(), MatchKind::Exact));
        }
        if let Some(name) = find_case_insensitive(expected, discovered) {
            return Some((name, MatchKind::CaseInsensitive));
        }
        aliases.aliases_for(expected).find_map(|alias| {
            discovered
                .get_key_value(alias)
                .map(|(name, _)| name.as_str())
                .or_else(|| find_case_insensitive(alias, discovered))
                .map(|name| (name, MatchKind::Alias))
        })
    }

    /// Expected names with no match in `discovered`, in `expected` order.
    pub fn find_missing<V>(
        expected: &[String],
        discovered: &BTreeMap<String, V>,
        aliases: &NameAliases,
    ) -> Vec<String> {
        expected
            .iter()
            .filter(|name| Self::match_name(name, discovered, aliases).is_none())
            .cloned()
            .collect()
    }
}

fn find_case_insensitive<'a, V>(name: &str, discovered: &'a BTreeMap<String, V>) -> Option<&'a str> {
    let wanted = name.to_lowercase();
    discovered
        .keys()
        .find(|k| k.to_lowercase() == wanted)
        .map(String::as_str)
}
