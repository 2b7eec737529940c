//! Street-type prefix vocabulary and stripping.
//!
//! Sources spell the street type differently (`VIA ROMA`, `V. ROMA`,
//! `ROMA`), so street names are compared only after the leading run of
//! street-type words is removed.

use std::collections::BTreeSet;

use crate::normalize::sanitize;

/// Built-in closed vocabulary of street-type words and abbreviations.
pub const STREET_PREFIXES: &[&str] = &[
    "VIA",
    "V",
    "VIALE",
    "VLE",
    "PIAZZA",
    "PZ",
    "PZZA",
    "PIAZZALE",
    "PLE",
    "LARGO",
    "LGO",
    "CORSO",
    "CRS",
    "STRADA",
    "STR",
    "SDA",
    "CONTRADA",
    "CTR",
    "LOCALITA",
    "LOC",
    "BORGO",
    "BGO",
    "VICOLO",
    "VICO",
    "SALITA",
    "SAL",
    "PIAZZETTA",
    "PZTTA",
    "TRAVERSA",
    "TRAV",
];

/// Removes leading street-type tokens from street strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetPrefixStripper {
    vocabulary: BTreeSet<String>,
}

impl Default for StreetPrefixStripper {
    fn default() -> Self {
        Self::new(STREET_PREFIXES.iter().copied())
    }
}

impl StreetPrefixStripper {
    /// Builds a stripper over a custom vocabulary.
    ///
    /// Entries are uppercased with periods and apostrophes removed, the
    /// same way tokens are cleaned before lookup. Blank entries are ignored.
    pub fn new<S: AsRef<str>>(vocabulary: impl IntoIterator<Item = S>) -> Self {
        let vocabulary = vocabulary
            .into_iter()
            .map(|word| clean_token(&word.as_ref().trim().to_uppercase()))
            .filter(|word| !word.is_empty())
            .collect();
        Self { vocabulary }
    }

    /// Builds from an optional configured list, falling back to
    /// [`STREET_PREFIXES`].
    #[must_use]
    pub fn from_config(prefixes: Option<&[String]>) -> Self {
        prefixes.map_or_else(Self::default, |list| Self::new(list))
    }

    /// Returns `true` if `token` is a street-type word.
    #[must_use]
    pub fn is_prefix(&self, token: &str) -> bool {
        self.vocabulary.contains(&clean_token(&token.to_uppercase()))
    }

    /// Uppercases `text` and removes its leading run of street-type tokens.
    ///
    /// Periods and commas are treated as spaces, and the remaining tokens
    /// are rejoined with single spaces. Stops at the first token outside
    /// the vocabulary, so only a prefix is ever removed.
    #[must_use]
    pub fn strip(&self, text: &str) -> String {
        let text = sanitize(text);
        if text.is_empty() {
            return String::new();
        }

        let upper = text.to_uppercase().replace(['.', ','], " ");
        let tokens: Vec<&str> = upper.split_whitespace().collect();
        let start = tokens
            .iter()
            .position(|token| !self.is_prefix(token))
            .unwrap_or(tokens.len());

        tokens[start..].join(" ")
    }
}

fn clean_token(token: &str) -> String {
    token.replace(['.', '\''], "")
}
