/// Synonym pairs used when matching expected package names against what a
/// package index lists. The built-in pair covers the JSON library that the
/// index publishes under a different name than the build system.
const BUILTIN_ALIASES: &[(&str, &str)] = &[("nlohmann_json", "jsonmcpp")];

/// Symmetric table of package-name synonyms.
#[derive(Debug, Clone)]
pub struct NameAliases {
    pairs: Vec<(String, String)>,
}

impl NameAliases {
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_ALIASES
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    /// Adds project-specific pairs on top of the built-in ones.
    pub fn with_pairs<I, A, B>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        self.pairs
            .extend(pairs.into_iter().map(|(a, b)| (a.into(), b.into())));
        self
    }

    /// Every synonym of `name`, in table order.
    pub fn aliases_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs.iter().filter_map(move |(a, b)| {
            if a == name {
                Some(b.as_str())
            } else if b == name {
                Some(a.as_str())
            } else {
                None
            }
        })
    }
}

impl Default for NameAliases {
    fn default() -> Self {
        Self::builtin()
    }
}
