#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address string segmentation.
//!
//! Splits a free-text address such as `"VIA ROMA 12/A SC B INT 3"` into
//! street, house number, staircase, floor, unit and extension. Markers are
//! often ambiguous (a street named after a date, a road with a kilometre
//! figure), so the house number is located by an ordered list of
//! [`HouseNumberStrategy`]s and the first match wins.
//!
//! Segmentation never fails with an error: an input that cannot be split
//! comes back with [`SegmentationOutcome::Failed`] and the sanitized input
//! as its street.
//!
//! [`segment_table`] runs the segmenter over the address column of a whole
//! table.

pub mod compact;
pub mod details;
pub mod markers;
pub mod strategies;
pub mod table;

use civic_link_address_models::{CompactAddress, SegmentationOutcome, SegmentedAddress};
use civic_link_config::SegmenterConfig;
use civic_link_normalize::sanitize;

pub use compact::compose;
pub use markers::MarkerSet;
pub use strategies::{
    BareNumber, DateThenNumber, ExplicitMarker, HOUSE_NUMBER_STRATEGIES, HouseNumberStrategy,
    NoNumberMarker, NumberLocation,
};
pub use table::{DEFAULT_ADDRESS_COLUMN, OutcomeTally, SegmentedRows, segment_table};

use crate::details::extract_details;
use crate::markers::{
    HOUSE_NUMBER_HEAD_RE, HOUSE_NUMBER_SUFFIX_RE, TRAILING_NUMBER_MARKER_RE, collapse_separators,
};
use crate::strategies::locate_house_number;

/// Splits address strings into [`SegmentedAddress`] fields.
///
/// Immutable after construction; one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct AddressSegmenter {
    config: SegmenterConfig,
    markers: MarkerSet,
}

impl AddressSegmenter {
    /// Compiles the configured markers.
    ///
    /// # Errors
    ///
    /// Returns [`SegmenterError`] if the configured marker lists are blank
    /// or fail to compile.
    pub fn new(config: &SegmenterConfig) -> Result<Self, SegmenterError> {
        let markers = MarkerSet::new(config)?;
        Ok(Self {
            config: config.clone(),
            markers,
        })
    }

    /// Segments one address string.
    #[must_use]
    pub fn segment(&self, raw: &str) -> SegmentedAddress {
        let original = sanitize(raw);
        if original.is_empty() {
            return SegmentedAddress::default();
        }

        let text = collapse_separators(&original.to_uppercase());

        if self.markers.is_route_reference(&text) {
            log::trace!("Route reference left unsegmented: {text}");
            return SegmentedAddress::unsegmented(original);
        }

        let Some((strategy, location)) =
            locate_house_number(HOUSE_NUMBER_STRATEGIES, &text, &self.markers)
        else {
            log::trace!("No house number found: {text}");
            return SegmentedAddress::unsegmented(original);
        };
        log::trace!("House number located by {strategy}: {text}");

        let before = text[..location.start()].trim();
        let street = TRAILING_NUMBER_MARKER_RE.replace(before, "").trim().to_string();
        if street.is_empty() {
            return SegmentedAddress::unsegmented(original);
        }

        let mut address = SegmentedAddress {
            street,
            ..SegmentedAddress::default()
        };

        let tail = match location {
            NumberLocation::Placeholder { end, .. } => {
                address.house_number.clone_from(&self.config.no_number_placeholder);
                text[end..].trim()
            }
            NumberLocation::Digits { start } => {
                let after = text[start..].trim();
                let Some(head) = HOUSE_NUMBER_HEAD_RE.captures(after) else {
                    address.house_number = after.to_string();
                    address.outcome = SegmentationOutcome::PartiallySegmented;
                    return address;
                };
                address.house_number = head[1].to_string();

                let mut rest = head.get(2).map_or("", |m| m.as_str()).trim();
                if let Some(suffix) = HOUSE_NUMBER_SUFFIX_RE.captures(rest) {
                    address.extension = suffix[1].to_string();
                    rest = suffix.get(2).map_or("", |m| m.as_str()).trim();
                }
                rest
            }
        };

        let details = extract_details(tail);
        address.staircase = details.staircase;
        address.floor = details.floor;
        address.unit = details.unit;
        if !details.leftover.is_empty() {
            address.extension = if address.extension.is_empty() {
                details.leftover
            } else {
                format!("{} {}", address.extension, details.leftover)
            };
        }

        let placeholder = matches!(location, NumberLocation::Placeholder { .. });
        address.outcome = classify(&address, placeholder);
        address
    }

    /// Segments one address string into its compact view.
    #[must_use]
    pub fn segment_compact(&self, raw: &str) -> CompactAddress {
        compose(&self.segment(raw), &self.config)
    }

    /// The configuration this segmenter was built from.
    #[must_use]
    pub const fn config(&self) -> &SegmenterConfig {
        &self.config
    }
}

fn classify(address: &SegmentedAddress, placeholder: bool) -> SegmentationOutcome {
    if address.street.is_empty() || address.house_number.is_empty() {
        SegmentationOutcome::Failed
    } else if placeholder || !address.extension.is_empty() {
        SegmentationOutcome::PartiallySegmented
    } else {
        SegmentationOutcome::FullySegmented
    }
}

/// Errors from building an [`AddressSegmenter`] or segmenting a table.
#[derive(Debug, thiserror::Error)]
pub enum SegmenterError {
    /// A configured marker list has no usable entry.
    #[error("Segmenter config field {field} has no usable entries")]
    EmptyVocabulary {
        /// Name of the config field.
        field: &'static str,
    },

    /// A pattern built from configuration did not compile.
    #[error("Invalid {name} pattern: {source}")]
    Pattern {
        /// Which pattern failed.
        name: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },

    /// The address table lacks the address column.
    #[error("Address table has no '{column}' column")]
    MissingColumn { column: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> AddressSegmenter {
        AddressSegmenter::new(&SegmenterConfig::default()).unwrap()
    }

    #[test]
    fn segments_staircase_and_unit() {
        let address = segmenter().segment("VIA ROMA 12 SC A INT 3");
        assert_eq!(address.street, "VIA ROMA");
        assert_eq!(address.house_number, "12");
        assert_eq!(address.staircase, "A");
        assert_eq!(address.unit, "3");
        assert!(address.floor.is_empty());
        assert!(address.extension.is_empty());
        assert_eq!(address.outcome, SegmentationOutcome::FullySegmented);
    }

    #[test]
    fn no_number_marker_yields_placeholder() {
        let address = segmenter().segment("VIA ROMA SNC");
        assert_eq!(address.street, "VIA ROMA");
        assert_eq!(address.house_number, "SNC");
        assert!(address.extension.is_empty());
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn short_no_number_marker_is_consumed() {
        let address = segmenter().segment("Via Roma, SN");
        assert_eq!(address.house_number, "SNC");
        assert!(address.extension.is_empty());
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn configured_placeholder_is_used() {
        let config = SegmenterConfig {
            no_number_placeholder: "0".to_string(),
            ..SegmenterConfig::default()
        };
        let address = AddressSegmenter::new(&config).unwrap().segment("VIA ROMA SNC");
        assert_eq!(address.house_number, "0");
    }

    #[test]
    fn no_number_anywhere_fails_with_original_street() {
        let address = segmenter().segment("  Via Senza Numero Visibile ");
        assert_eq!(address.street, "Via Senza Numero Visibile");
        assert!(address.house_number.is_empty());
        assert_eq!(address.outcome, SegmentationOutcome::Failed);
    }

    #[test]
    fn empty_input_fails_with_empty_street() {
        let address = segmenter().segment(" \u{a0} ");
        assert_eq!(address, SegmentedAddress::default());
    }

    #[test]
    fn explicit_marker_drops_dangling_n() {
        let address = segmenter().segment("Via Garibaldi n. 5");
        assert_eq!(address.street, "VIA GARIBALDI");
        assert_eq!(address.house_number, "5");
        assert_eq!(address.outcome, SegmentationOutcome::FullySegmented);
    }

    #[test]
    fn degree_marker_is_dropped_from_street() {
        let address = segmenter().segment("VIA GARIBALDI N° 5");
        assert_eq!(address.street, "VIA GARIBALDI");
        assert_eq!(address.house_number, "5");
    }

    #[test]
    fn date_named_street_keeps_day_in_street() {
        let address = segmenter().segment("Via 4 Novembre, 12");
        assert_eq!(address.street, "VIA 4 NOVEMBRE");
        assert_eq!(address.house_number, "12");
        assert_eq!(address.outcome, SegmentationOutcome::FullySegmented);
    }

    #[test]
    fn date_without_later_number_falls_back_to_day() {
        let address = segmenter().segment("VIA 4 NOVEMBRE");
        assert_eq!(address.street, "VIA");
        assert_eq!(address.house_number, "4");
        assert_eq!(address.extension, "NOVEMBRE");
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn slash_suffix_goes_to_extension() {
        let address = segmenter().segment("VIA ROMA 12/A");
        assert_eq!(address.house_number, "12");
        assert_eq!(address.extension, "A");
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn letter_is_part_of_house_number() {
        let address = segmenter().segment("VIA ROMA 12B");
        assert_eq!(address.house_number, "12B");
        assert_eq!(address.outcome, SegmentationOutcome::FullySegmented);
    }

    #[test]
    fn suffix_and_leftover_are_joined() {
        let address = segmenter().segment("VIA ROMA 12-BIS PIANO 2 RETRO");
        assert_eq!(address.house_number, "12");
        assert_eq!(address.floor, "2");
        assert_eq!(address.extension, "BIS RETRO");
    }

    #[test]
    fn number_at_start_fails() {
        let address = segmenter().segment("12 VIA ROMA");
        assert_eq!(address.street, "12 VIA ROMA");
        assert_eq!(address.outcome, SegmentationOutcome::Failed);
    }

    #[test]
    fn route_with_kilometre_is_left_whole() {
        let address = segmenter().segment("S.S. 16 km. 12,500");
        assert_eq!(address.street, "S.S. 16 km. 12,500");
        assert!(address.house_number.is_empty());
        assert_eq!(address.outcome, SegmentationOutcome::Failed);
    }

    #[test]
    fn route_with_explicit_number_is_segmented() {
        let address = segmenter().segment("SS 16 KM 12 N 5");
        assert_eq!(address.street, "SS 16 KM 12");
        assert_eq!(address.house_number, "5");
        assert_eq!(address.outcome, SegmentationOutcome::FullySegmented);
    }

    #[test]
    fn route_with_no_number_marker_is_segmented() {
        let address = segmenter().segment("SP 45 KM 3 SNC");
        assert_eq!(address.street, "SP 45 KM 3");
        assert_eq!(address.house_number, "SNC");
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);
    }

    // A road acronym without a kilometre marker skips the route guard and
    // goes through the ordinary locator.
    #[test]
    fn route_without_kilometre_uses_ordinary_locator() {
        let address = segmenter().segment("SP 45 12");
        assert_eq!(address.street, "SP");
        assert_eq!(address.house_number, "45");
        assert_eq!(address.extension, "12");
        assert_eq!(address.outcome, SegmentationOutcome::PartiallySegmented);

        let address = segmenter().segment("SP Per Monte");
        assert_eq!(address.street, "SP Per Monte");
        assert_eq!(address.outcome, SegmentationOutcome::Failed);
    }

    #[test]
    fn compact_view_folds_details() {
        let compact = segmenter().segment_compact("Via Roma 12/A, scala B, piano 2, int. 5");
        assert_eq!(compact.street, "VIA ROMA");
        assert_eq!(compact.house_number, "12");
        assert_eq!(compact.specifics, "SC B INT 5 PI 2 A");
        assert_eq!(compact.outcome, SegmentationOutcome::PartiallySegmented);
    }

    #[test]
    fn segmenter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AddressSegmenter>();
    }

    #[test]
    fn rejects_blank_markers() {
        let config = SegmenterConfig {
            no_number_markers: vec!["  ".to_string()],
            ..SegmenterConfig::default()
        };
        assert!(matches!(
            AddressSegmenter::new(&config),
            Err(SegmenterError::EmptyVocabulary { .. })
        ));
    }
}
