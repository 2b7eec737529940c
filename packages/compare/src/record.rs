//! Four-field comparison of one address record pair.

use civic_link_address_models::FieldFlags;
use civic_link_config::MatchingConfig;
use civic_link_normalize::{AliasTable, StreetPrefixStripper};
use serde::{Deserialize, Serialize};

use crate::verdict::{FuzzyValueComparator, aggregate};

/// The compared fields of one address, as read from a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub municipality: String,
    pub street: String,
    pub house_number: String,
    /// Staircase, unit, floor and extension folded into one value.
    pub details: String,
}

/// Compares address records field by field.
///
/// The municipality is compared through the alias table, the street with
/// street-type prefixes stripped from both sides, house number and details
/// as plain values.
#[derive(Debug, Clone)]
pub struct RecordComparator {
    values: FuzzyValueComparator,
    aliases: AliasTable,
    stripper: StreetPrefixStripper,
}

impl RecordComparator {
    #[must_use]
    pub const fn new(
        matching: &MatchingConfig,
        aliases: AliasTable,
        stripper: StreetPrefixStripper,
    ) -> Self {
        Self {
            values: FuzzyValueComparator::new(matching),
            aliases,
            stripper,
        }
    }

    /// Compares `left` against `right` and aggregates the four verdicts.
    #[must_use]
    pub fn compare(&self, left: &AddressFields, right: &AddressFields) -> FieldFlags {
        let strip = |text: &str| self.stripper.strip(text);

        let municipality =
            self.values
                .compare(&left.municipality, &right.municipality, Some(&self.aliases), None);
        let street = self
            .values
            .compare(&left.street, &right.street, None, Some(&strip));
        let house_number = self
            .values
            .compare(&left.house_number, &right.house_number, None, None);
        let details = self.values.compare(&left.details, &right.details, None, None);

        let overall = aggregate(&[municipality, street, house_number, details]);
        FieldFlags {
            municipality,
            street,
            house_number,
            details,
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use civic_link_address_models::{AggregateVerdict, ComparisonVerdict};

    use super::*;

    fn comparator() -> RecordComparator {
        RecordComparator::new(
            &MatchingConfig::default(),
            AliasTable::builtin().unwrap(),
            StreetPrefixStripper::default(),
        )
    }

    fn fields(municipality: &str, street: &str, house_number: &str, details: &str) -> AddressFields {
        AddressFields {
            municipality: municipality.to_string(),
            street: street.to_string(),
            house_number: house_number.to_string(),
            details: details.to_string(),
        }
    }

    #[test]
    fn identical_records_coincide() {
        let record = fields("Merano", "Via Roma", "12", "SC A");
        let flags = comparator().compare(&record, &record);
        assert_eq!(flags.fields(), [ComparisonVerdict::Equal; 4]);
        assert_eq!(flags.overall, AggregateVerdict::Coincidence);
    }

    #[test]
    fn aliases_and_prefixes_are_equal() {
        let left = fields("Meran", "V. Roma", "12", "");
        let right = fields("MERANO", "ROMA", "12", "");
        let flags = comparator().compare(&left, &right);
        assert_eq!(flags.municipality, ComparisonVerdict::Equal);
        assert_eq!(flags.street, ComparisonVerdict::Equal);
        assert_eq!(flags.details, ComparisonVerdict::EmptyOnBoth);
        assert_eq!(flags.overall, AggregateVerdict::Coincidence);
    }

    #[test]
    fn empty_records_coincide() {
        let flags = comparator().compare(&AddressFields::default(), &AddressFields::default());
        assert_eq!(flags.fields(), [ComparisonVerdict::EmptyOnBoth; 4]);
        assert_eq!(flags.overall, AggregateVerdict::Coincidence);
    }

    #[test]
    fn one_sided_detail_is_incomplete() {
        let left = fields("Trento", "Via Roma", "12", "");
        let right = fields("Trento", "Via Roma", "12", "INT 3");
        let flags = comparator().compare(&left, &right);
        assert_eq!(flags.details, ComparisonVerdict::MissingOnLeft);
        assert_eq!(flags.overall, AggregateVerdict::Incomplete);
    }

    #[test]
    fn misspelled_street_is_similar() {
        let left = fields("Trento", "Via Garibaldi", "12", "");
        let right = fields("Trento", "Via Garibaldo", "12", "");
        let flags = comparator().compare(&left, &right);
        assert_eq!(flags.street, ComparisonVerdict::Similar);
        assert_eq!(flags.overall, AggregateVerdict::Similar);
    }

    #[test]
    fn different_house_number_is_difference() {
        let left = fields("Trento", "Via Roma", "12", "");
        let right = fields("Trento", "Via Roma", "14", "");
        let flags = comparator().compare(&left, &right);
        assert_eq!(flags.house_number, ComparisonVerdict::Different);
        assert_eq!(flags.overall, AggregateVerdict::Difference);
    }
}
