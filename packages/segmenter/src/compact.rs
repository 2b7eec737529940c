//! Compact view of a segmented address.

use civic_link_address_models::{CompactAddress, SegmentedAddress};
use civic_link_config::SegmenterConfig;

/// Folds staircase, unit, floor and extension into one `specifics` field.
///
/// Non-empty parts are joined with single spaces in fixed order: staircase,
/// unit and floor, each prefixed with its configured label, then the
/// extension as is.
#[must_use]
pub fn compose(address: &SegmentedAddress, config: &SegmenterConfig) -> CompactAddress {
    let labelled = [
        (config.staircase_label.as_str(), address.staircase.trim()),
        (config.unit_label.as_str(), address.unit.trim()),
        (config.floor_label.as_str(), address.floor.trim()),
    ];

    let mut pieces: Vec<String> = labelled
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label} {value}"))
        .collect();

    let extension = address.extension.trim();
    if !extension.is_empty() {
        pieces.push(extension.to_string());
    }

    CompactAddress {
        street: address.street.trim().to_string(),
        house_number: address.house_number.trim().to_string(),
        specifics: pieces.join(" "),
        outcome: address.outcome,
    }
}

#[cfg(test)]
mod tests {
    use civic_link_address_models::SegmentationOutcome;

    use super::*;

    #[test]
    fn orders_staircase_unit_floor_then_extension() {
        let address = SegmentedAddress {
            street: "VIA ROMA".to_string(),
            house_number: "12".to_string(),
            staircase: "A".to_string(),
            unit: "3".to_string(),
            floor: "2".to_string(),
            extension: "BIS".to_string(),
            outcome: SegmentationOutcome::PartiallySegmented,
        };

        let compact = compose(&address, &SegmenterConfig::default());
        assert_eq!(compact.street, "VIA ROMA");
        assert_eq!(compact.house_number, "12");
        assert_eq!(compact.specifics, "SC A INT 3 PI 2 BIS");
        assert_eq!(compact.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn skips_empty_parts() {
        let address = SegmentedAddress {
            street: "VIA ROMA".to_string(),
            house_number: "12".to_string(),
            floor: "T".to_string(),
            ..SegmentedAddress::default()
        };
        assert_eq!(compose(&address, &SegmenterConfig::default()).specifics, "PI T");
    }

    #[test]
    fn uses_configured_labels() {
        let config = SegmenterConfig {
            staircase_label: "SCALA".to_string(),
            ..SegmenterConfig::default()
        };
        let address = SegmentedAddress {
            staircase: "B".to_string(),
            ..SegmentedAddress::default()
        };
        assert_eq!(compose(&address, &config).specifics, "SCALA B");
    }
}
