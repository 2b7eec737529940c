//! House-number locating strategies.
//!
//! Each strategy looks for one kind of evidence of where the house number
//! starts. [`HOUSE_NUMBER_STRATEGIES`] lists them from most to least
//! specific; the segmenter takes the first one that finds anything, so a
//! loose match (a bare number) can never override an explicit `N 12`.

use crate::markers::{BARE_NUMBER_RE, EXPLICIT_NUMBER_RE, MarkerSet};

/// Where the house number was found in the cleaned address text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberLocation {
    /// A numeric house number starting at `start`.
    Digits {
        /// Byte offset of the first digit.
        start: usize,
    },
    /// A no-number marker spanning `start..end`.
    Placeholder {
        /// Byte offset of the marker.
        start: usize,
        /// Byte offset just past the marker.
        end: usize,
    },
}

impl NumberLocation {
    /// Offset at which the street part ends.
    #[must_use]
    pub const fn start(&self) -> usize {
        match self {
            Self::Digits { start } | Self::Placeholder { start, .. } => *start,
        }
    }
}

/// One way of locating the house number in an address.
pub trait HouseNumberStrategy: Send + Sync {
    /// Short name used in trace logs.
    fn name(&self) -> &'static str;

    /// Looks for the house number in `text`, which is uppercase with
    /// separators collapsed.
    fn locate(&self, text: &str, markers: &MarkerSet) -> Option<NumberLocation>;
}

/// `N 12`, `N° 12`: position is the first digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitMarker;

impl HouseNumberStrategy for ExplicitMarker {
    fn name(&self) -> &'static str {
        "explicit_marker"
    }

    fn locate(&self, text: &str, _markers: &MarkerSet) -> Option<NumberLocation> {
        EXPLICIT_NUMBER_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|digits| NumberLocation::Digits {
                start: digits.start(),
            })
    }
}

/// `SNC`, `SN`: the address explicitly has no house number.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNumberMarker;

impl HouseNumberStrategy for NoNumberMarker {
    fn name(&self) -> &'static str {
        "no_number_marker"
    }

    fn locate(&self, text: &str, markers: &MarkerSet) -> Option<NumberLocation> {
        markers
            .no_number
            .find(text)
            .map(|m| NumberLocation::Placeholder {
                start: m.start(),
                end: m.end(),
            })
    }
}

/// `VIA 4 NOVEMBRE 12`: skips the day of a street named after a date and
/// takes the next number after the month.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateThenNumber;

impl HouseNumberStrategy for DateThenNumber {
    fn name(&self) -> &'static str {
        "date_then_number"
    }

    fn locate(&self, text: &str, markers: &MarkerSet) -> Option<NumberLocation> {
        let date = markers.date.find(text)?;
        let tail = &text[date.end()..];
        BARE_NUMBER_RE.find(tail).map(|m| NumberLocation::Digits {
            start: date.end() + m.start(),
        })
    }
}

/// First standalone number anywhere in the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BareNumber;

impl HouseNumberStrategy for BareNumber {
    fn name(&self) -> &'static str {
        "bare_number"
    }

    fn locate(&self, text: &str, _markers: &MarkerSet) -> Option<NumberLocation> {
        BARE_NUMBER_RE
            .find(text)
            .map(|m| NumberLocation::Digits { start: m.start() })
    }
}

/// Strategies in priority order.
pub const HOUSE_NUMBER_STRATEGIES: &[&dyn HouseNumberStrategy] =
    &[&ExplicitMarker, &NoNumberMarker, &DateThenNumber, &BareNumber];

/// Runs `strategies` in order and returns the first hit with the name of
/// the strategy that produced it.
#[must_use]
pub fn locate_house_number(
    strategies: &[&dyn HouseNumberStrategy],
    text: &str,
    markers: &MarkerSet,
) -> Option<(&'static str, NumberLocation)> {
    strategies.iter().find_map(|strategy| {
        strategy
            .locate(text, markers)
            .map(|location| (strategy.name(), location))
    })
}
