#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared result types for address segmentation, gazetteer matching and
//! two-source field comparison.
//!
//! This crate contains only data types and simple conversions. Every
//! per-row outcome of the engine is one of these values; none of them is
//! an error.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How completely an address string was decomposed.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SegmentationOutcome {
    /// No house number could be isolated; the street holds the input.
    #[default]
    Failed,
    /// Street and house number found, but the number is the no-number
    /// placeholder or unstructured text remains.
    PartiallySegmented,
    /// Street and a genuine house number found with nothing left over.
    FullySegmented,
}

/// An address string decomposed into typed sub-fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedAddress {
    /// Street name, including its street-type prefix.
    pub street: String,
    /// House number, or the no-number placeholder.
    pub house_number: String,
    /// Staircase designation (`SC A`).
    pub staircase: String,
    /// Unit / apartment designation (`INT 3`).
    pub unit: String,
    /// Floor designation (`PIANO 2`).
    pub floor: String,
    /// House-number suffix plus any unrecognized trailing text.
    pub extension: String,
    /// Classification of the decomposition.
    pub outcome: SegmentationOutcome,
}

impl SegmentedAddress {
    /// A failed decomposition that keeps the whole input as the street.
    #[must_use]
    pub fn unsegmented(street: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            ..Self::default()
        }
    }
}

/// Compact projection of a [`SegmentedAddress`] that folds staircase,
/// unit, floor and extension into one free-text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactAddress {
    /// Street name.
    pub street: String,
    /// House number.
    pub house_number: String,
    /// Everything after the house number (`SC A INT 3 PI 2 BIS`).
    pub specifics: String,
    /// Outcome of the underlying decomposition.
    pub outcome: SegmentationOutcome,
}

/// Column holding the [`SegmentationOutcome`] of a segmented row.
pub const OUTCOME_COLUMN: &str = "esito";

/// Column layout of a table holding segmented addresses.
///
/// Segmentation writes one of these layouts and two-source comparison
/// reads it back.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressLayout {
    /// One free-text column holds every detail after the house number.
    #[default]
    Compact,
    /// Staircase, unit, floor and extension have their own columns.
    Detailed,
}

impl AddressLayout {
    /// Street column name.
    #[must_use]
    pub const fn street_column(self) -> &'static str {
        match self {
            Self::Compact => "indirizzo_diviso",
            Self::Detailed => "indirizzo",
        }
    }

    /// House-number column name.
    #[must_use]
    pub const fn house_number_column(self) -> &'static str {
        match self {
            Self::Compact => "civico_diviso",
            Self::Detailed => "civico",
        }
    }

    /// Detail columns, in order.
    #[must_use]
    pub const fn detail_columns(self) -> &'static [&'static str] {
        match self {
            Self::Compact => &["specifica_civico_diviso"],
            Self::Detailed => &["scala", "interno", "piano", "estensione"],
        }
    }

    /// Every column of the layout in order, outcome column last.
    #[must_use]
    pub fn columns(self) -> Vec<&'static str> {
        let mut columns = vec![self.street_column(), self.house_number_column()];
        columns.extend_from_slice(self.detail_columns());
        columns.push(OUTCOME_COLUMN);
        columns
    }
}

/// Verdict of comparing one field across two sources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComparisonVerdict {
    /// Same value after case folding or normalization.
    Equal,
    /// Different text above the similarity threshold.
    Similar,
    /// Different text below the similarity threshold.
    Different,
    /// Both sides empty.
    EmptyOnBoth,
    /// Only the right side has a value.
    MissingOnLeft,
    /// Only the left side has a value.
    MissingOnRight,
}

impl ComparisonVerdict {
    /// Returns `true` for [`Self::MissingOnLeft`] and [`Self::MissingOnRight`].
    #[must_use]
    pub const fn is_missing(self) -> bool {
        matches!(self, Self::MissingOnLeft | Self::MissingOnRight)
    }

    /// Returns `true` when the two sides agree (equal, or both empty).
    #[must_use]
    pub const fn is_agreement(self) -> bool {
        matches!(self, Self::Equal | Self::EmptyOnBoth)
    }
}

/// Verdict summarizing the per-field verdicts of one record pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregateVerdict {
    /// Every field equal or empty on both sides.
    Coincidence,
    /// At least one field differs.
    Difference,
    /// No field differs, at least one is only similar.
    Similar,
    /// Nothing differs or is similar, but a field is missing on one side.
    Incomplete,
    /// Any other combination.
    Partial,
}

/// The five categorical flags of a four-field record comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlags {
    /// Municipality verdict (alias-aware).
    pub municipality: ComparisonVerdict,
    /// Street verdict (prefix-insensitive).
    pub street: ComparisonVerdict,
    /// House-number verdict.
    pub house_number: ComparisonVerdict,
    /// Verdict over the remaining details (staircase, unit, ...).
    pub details: ComparisonVerdict,
    /// Aggregate over the four field verdicts.
    pub overall: AggregateVerdict,
}

impl FieldFlags {
    /// The four field verdicts in their fixed order.
    #[must_use]
    pub const fn fields(&self) -> [ComparisonVerdict; 4] {
        [
            self.municipality,
            self.street,
            self.house_number,
            self.details,
        ]
    }
}

/// Status of a gazetteer street-code lookup.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatchStatus {
    /// Unique match on the normalized street.
    Exact,
    /// Unique best fuzzy match above the similarity threshold.
    Fuzzy,
    /// No municipality given.
    MunicipalityMissing,
    /// The municipality has no gazetteer entries.
    MunicipalityNotFound,
    /// No street given.
    StreetMissing,
    /// More than one equally good candidate.
    StreetAmbiguous,
    /// No candidate reached the similarity threshold.
    StreetNotFound,
}

impl MatchStatus {
    /// Returns `true` for statuses that carry a code.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Exact | Self::Fuzzy)
    }
}

/// Result of resolving a street to its gazetteer code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The street code, empty unless `status` is a success.
    pub code: String,
    /// How the lookup ended.
    pub status: MatchStatus,
}

impl Resolution {
    /// A successful lookup.
    #[must_use]
    pub fn found(code: impl Into<String>, status: MatchStatus) -> Self {
        Self {
            code: code.into(),
            status,
        }
    }

    /// A lookup that produced no code.
    #[must_use]
    pub const fn miss(status: MatchStatus) -> Self {
        Self {
            code: String::new(),
            status,
        }
    }
}

/// Human-facing confidence flag for an assigned street code.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CodeFlag {
    /// Exact normalized match.
    Certain,
    /// Fuzzy match.
    Similar,
    /// No code assigned; see the status for the reason.
    NotFound,
}

impl From<MatchStatus> for CodeFlag {
    fn from(status: MatchStatus) -> Self {
        match status {
            MatchStatus::Exact => Self::Certain,
            MatchStatus::Fuzzy => Self::Similar,
            MatchStatus::MunicipalityMissing
            | MatchStatus::MunicipalityNotFound
            | MatchStatus::StreetMissing
            | MatchStatus::StreetAmbiguous
            | MatchStatus::StreetNotFound => Self::NotFound,
        }
    }
}
