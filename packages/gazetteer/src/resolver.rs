//! Street name → street code resolution.
//!
//! A lookup first tries the exact normalized street within the
//! municipality, then falls back to fuzzy similarity over the
//! municipality's cleaned streets. Both paths refuse to guess: more than
//! one equally good candidate yields [`MatchStatus::StreetAmbiguous`].

use civic_link_address_models::{MatchStatus, Resolution};
use civic_link_config::MatchingConfig;
use civic_link_normalize::{AliasTable, StreetPrefixStripper, normalize, ratio};
use civic_link_table::Table;

use crate::GazetteerError;
use crate::entry::{GazetteerColumns, GazetteerEntry, build_entries};
use crate::index::StreetIndex;

/// Best-scoring candidates of a fuzzy search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestCandidates<T> {
    /// Ratio of the candidate that opened the current tie group.
    pub ratio: f64,
    /// Candidates within the tie margin of `ratio`, in input order.
    pub candidates: Vec<T>,
}

/// Picks the best candidates from `(candidate, ratio)` pairs.
///
/// Scores are folded in order. A ratio more than `tie_margin` above the
/// current best starts a new group; a ratio within `tie_margin` of the
/// current best joins the group without moving the best; anything lower is
/// dropped. The best starts at `0.0` with no candidates.
#[must_use]
pub fn select_best<T>(
    scores: impl IntoIterator<Item = (T, f64)>,
    tie_margin: f64,
) -> BestCandidates<T> {
    let mut best = BestCandidates {
        ratio: 0.0,
        candidates: Vec::new(),
    };

    for (candidate, ratio) in scores {
        if ratio > best.ratio + tie_margin {
            best.ratio = ratio;
            best.candidates.clear();
            best.candidates.push(candidate);
        } else if (ratio - best.ratio).abs() <= tie_margin {
            best.candidates.push(candidate);
        }
    }

    best
}

/// Resolves streets of a municipality to gazetteer codes.
#[derive(Debug, Clone)]
pub struct StreetCodeResolver {
    index: StreetIndex,
    aliases: AliasTable,
    stripper: StreetPrefixStripper,
    similarity_threshold: f64,
    tie_margin: f64,
}

impl StreetCodeResolver {
    /// Indexes `entries` for lookup.
    ///
    /// `aliases` and `stripper` must be the ones the entries were built
    /// with; [`Self::resolve_text`] cleans its input the same way.
    #[must_use]
    pub fn new(
        entries: Vec<GazetteerEntry>,
        aliases: AliasTable,
        stripper: StreetPrefixStripper,
        matching: &MatchingConfig,
    ) -> Self {
        Self {
            index: StreetIndex::new(entries),
            aliases,
            stripper,
            similarity_threshold: matching.similarity_threshold,
            tie_margin: matching.tie_margin,
        }
    }

    /// Builds entries from a gazetteer table and indexes them.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`build_entries`].
    pub fn from_table(
        table: &Table,
        columns: &GazetteerColumns,
        aliases: AliasTable,
        stripper: StreetPrefixStripper,
        matching: &MatchingConfig,
    ) -> Result<Self, GazetteerError> {
        let entries = build_entries(table, columns, &aliases, &stripper)?;
        Ok(Self::new(entries, aliases, stripper, matching))
    }

    /// The underlying index.
    #[must_use]
    pub const fn index(&self) -> &StreetIndex {
        &self.index
    }

    /// Resolves free-text municipality and street values.
    ///
    /// The municipality goes through the alias table and the street through
    /// prefix stripping before [`Self::resolve`].
    #[must_use]
    pub fn resolve_text(&self, municipality: &str, street: &str) -> Resolution {
        let municipality_key = self.aliases.canonical(municipality);
        let street_clean = self.stripper.strip(street);
        let street_normalized = normalize(&street_clean);
        self.resolve(
            municipality_key.as_str(),
            &street_clean,
            street_normalized.as_str(),
        )
    }

    /// Resolves an already cleaned street within a municipality.
    #[must_use]
    pub fn resolve(
        &self,
        municipality_key: &str,
        street_clean: &str,
        street_normalized: &str,
    ) -> Resolution {
        if municipality_key.is_empty() {
            return Resolution::miss(MatchStatus::MunicipalityMissing);
        }
        if !self.index.has_municipality(municipality_key) {
            return Resolution::miss(MatchStatus::MunicipalityNotFound);
        }
        if street_normalized.is_empty() {
            return Resolution::miss(MatchStatus::StreetMissing);
        }

        let exact: Vec<&GazetteerEntry> =
            self.index.exact(municipality_key, street_normalized).collect();
        if !exact.is_empty() {
            return single_hit(&exact, MatchStatus::Exact);
        }

        let street = street_clean.to_lowercase();
        let scores = self
            .index
            .in_municipality(municipality_key)
            .filter(|entry| !entry.cleaned_street.is_empty())
            .map(|entry| (entry, ratio(&entry.cleaned_street.to_lowercase(), &street)));
        let best = select_best(scores, self.tie_margin);

        log::trace!(
            "Fuzzy lookup of {street_clean:?} in {municipality_key}: best {:.3} with {} candidate(s)",
            best.ratio,
            best.candidates.len()
        );

        if best.ratio < self.similarity_threshold || best.candidates.is_empty() {
            return Resolution::miss(MatchStatus::StreetNotFound);
        }

        single_hit(&best.candidates, MatchStatus::Fuzzy)
    }
}

/// Resolves to the code of the only hit. Several hits are ambiguous even
/// when they share a code, since they are still distinct gazetteer rows.
fn single_hit(hits: &[&GazetteerEntry], status: MatchStatus) -> Resolution {
    match hits {
        [entry] => Resolution::found(entry.code.as_str(), status),
        _ => Resolution::miss(MatchStatus::StreetAmbiguous),
    }
}
