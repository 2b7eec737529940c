//! Single-value comparison and verdict aggregation.

use civic_link_address_models::{AggregateVerdict, ComparisonVerdict};
use civic_link_config::MatchingConfig;
use civic_link_normalize::{AliasTable, normalize, ratio, sanitize};

/// Compares two free-text values of the same field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyValueComparator {
    similarity_threshold: f64,
}

impl Default for FuzzyValueComparator {
    fn default() -> Self {
        Self::new(&MatchingConfig::default())
    }
}

impl FuzzyValueComparator {
    #[must_use]
    pub const fn new(matching: &MatchingConfig) -> Self {
        Self {
            similarity_threshold: matching.similarity_threshold,
        }
    }

    /// Compares `left` and `right`.
    ///
    /// Both values are sanitized and then passed through `preprocess`, if
    /// given. Empty sides are reported before anything else. Values equal
    /// ignoring case, or with equal non-empty keys, are
    /// [`ComparisonVerdict::Equal`]; keys come from `aliases` when given,
    /// otherwise from plain normalization. Remaining pairs are
    /// [`ComparisonVerdict::Similar`] when their similarity ratio reaches
    /// the threshold and [`ComparisonVerdict::Different`] otherwise.
    #[must_use]
    pub fn compare(
        &self,
        left: &str,
        right: &str,
        aliases: Option<&AliasTable>,
        preprocess: Option<&dyn Fn(&str) -> String>,
    ) -> ComparisonVerdict {
        let (mut left, mut right) = (sanitize(left), sanitize(right));
        if let Some(preprocess) = preprocess {
            left = preprocess(&left);
            right = preprocess(&right);
        }

        match (left.is_empty(), right.is_empty()) {
            (true, true) => return ComparisonVerdict::EmptyOnBoth,
            (true, false) => return ComparisonVerdict::MissingOnLeft,
            (false, true) => return ComparisonVerdict::MissingOnRight,
            (false, false) => {}
        }

        if left.to_lowercase() == right.to_lowercase() {
            return ComparisonVerdict::Equal;
        }

        let (left_key, right_key) = aliases.map_or_else(
            || (normalize(&left), normalize(&right)),
            |aliases| (aliases.canonical(&left), aliases.canonical(&right)),
        );
        if !left_key.is_empty() && left_key == right_key {
            return ComparisonVerdict::Equal;
        }

        if ratio(&left, &right) >= self.similarity_threshold {
            ComparisonVerdict::Similar
        } else {
            ComparisonVerdict::Different
        }
    }
}

/// Summarizes the four field verdicts of a record pair.
///
/// Rules apply in order: all fields agree → coincidence; any field
/// different → difference; any similar → similar; any missing on one side
/// → incomplete; otherwise partial.
#[must_use]
pub fn aggregate(verdicts: &[ComparisonVerdict; 4]) -> AggregateVerdict {
    if verdicts.iter().all(|v| v.is_agreement()) {
        AggregateVerdict::Coincidence
    } else if verdicts.contains(&ComparisonVerdict::Different) {
        AggregateVerdict::Difference
    } else if verdicts.contains(&ComparisonVerdict::Similar) {
        AggregateVerdict::Similar
    } else if verdicts.iter().any(|v| v.is_missing()) {
        AggregateVerdict::Incomplete
    } else {
        AggregateVerdict::Partial
    }
}
