//! Position indexes over the gazetteer entries.
//!
//! Entries live in one arena; both lookups store arena positions, so an
//! entry is never duplicated no matter how many lookups reach it.

use std::collections::HashMap;

use civic_link_normalize::NormalizedKey;

use crate::entry::GazetteerEntry;

/// Gazetteer entries grouped by municipality and by normalized street.
#[derive(Debug, Clone, Default)]
pub struct StreetIndex {
    entries: Vec<GazetteerEntry>,
    by_municipality: HashMap<NormalizedKey, Vec<usize>>,
    /// Municipality key → normalized street → positions.
    by_street: HashMap<NormalizedKey, HashMap<NormalizedKey, Vec<usize>>>,
}

impl StreetIndex {
    /// Indexes `entries`. Entries with an empty normalized street are
    /// reachable by municipality only.
    #[must_use]
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        let mut by_municipality: HashMap<NormalizedKey, Vec<usize>> = HashMap::new();
        let mut by_street: HashMap<NormalizedKey, HashMap<NormalizedKey, Vec<usize>>> =
            HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            by_municipality
                .entry(entry.municipality_key.clone())
                .or_default()
                .push(position);

            if !entry.normalized_street.is_empty() {
                by_street
                    .entry(entry.municipality_key.clone())
                    .or_default()
                    .entry(entry.normalized_street.clone())
                    .or_default()
                    .push(position);
            }
        }

        log::info!(
            "Indexed {} gazetteer entries across {} municipalities",
            entries.len(),
            by_municipality.len()
        );

        Self {
            entries,
            by_municipality,
            by_street,
        }
    }

    /// Number of indexed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the municipality has at least one entry.
    #[must_use]
    pub fn has_municipality(&self, municipality_key: &str) -> bool {
        self.by_municipality.contains_key(municipality_key)
    }

    /// Entries of one municipality, in arena order.
    pub fn in_municipality<'a>(
        &'a self,
        municipality_key: &str,
    ) -> impl Iterator<Item = &'a GazetteerEntry> + use<'a> {
        self.resolve(self.by_municipality.get(municipality_key).map(Vec::as_slice))
    }

    /// Entries whose normalized street equals `normalized_street` within
    /// one municipality.
    pub fn exact<'a>(
        &'a self,
        municipality_key: &str,
        normalized_street: &str,
    ) -> impl Iterator<Item = &'a GazetteerEntry> + use<'a> {
        let positions = self
            .by_street
            .get(municipality_key)
            .and_then(|streets| streets.get(normalized_street))
            .map(Vec::as_slice);
        self.resolve(positions)
    }

    fn resolve<'a>(
        &'a self,
        positions: Option<&'a [usize]>,
    ) -> impl Iterator<Item = &'a GazetteerEntry> + 'a {
        positions
            .into_iter()
            .flatten()
            .filter_map(|&position| self.entries.get(position))
    }
}

#[cfg(test)]
mod tests {
    use civic_link_normalize::normalize;

    use super::*;

    fn entry(municipality: &str, street: &str, code: &str) -> GazetteerEntry {
        GazetteerEntry {
            municipality_key: normalize(municipality),
            code: code.to_string(),
            cleaned_street: street.to_string(),
            normalized_street: normalize(street),
        }
    }

    fn index() -> StreetIndex {
        StreetIndex::new(vec![
            entry("TRENTO", "ROMA", "1"),
            entry("TRENTO", "ROMA ALTA", "2"),
            entry("ROVERETO", "ROMA", "3"),
            entry("TRENTO", "", "4"),
        ])
    }

    #[test]
    fn groups_by_municipality() {
        let index = index();
        let codes: Vec<&str> = index
            .in_municipality("TRENTO")
            .map(|e| e.code.as_str())
            .collect();
        assert_eq!(codes, ["1", "2", "4"]);
        assert!(index.has_municipality("ROVERETO"));
        assert!(!index.has_municipality("BOLZANO"));
        assert_eq!(index.in_municipality("BOLZANO").count(), 0);
    }

    #[test]
    fn exact_lookup_is_scoped_to_municipality() {
        let index = index();
        let codes: Vec<&str> = index.exact("TRENTO", "ROMA").map(|e| e.code.as_str()).collect();
        assert_eq!(codes, ["1"]);
        assert_eq!(index.exact("TRENTO", "ROMAALTA").count(), 1);
        assert_eq!(index.exact("BOLZANO", "ROMA").count(), 0);
    }

    #[test]
    fn empty_street_is_not_exact_indexed() {
        let index = index();
        assert_eq!(index.exact("TRENTO", "").count(), 0);
        assert_eq!(index.len(), 4);
    }
}
