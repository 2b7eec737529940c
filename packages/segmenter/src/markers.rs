//! Textual markers recognized inside an address string.
//!
//! Fixed markers (road acronyms, kilometre and house-number markers, the
//! detail labels) are compiled once as statics. Markers that come from
//! configuration (no-number tokens, month names) are compiled per
//! [`MarkerSet`].
//!
//! Every pattern runs on text already passed through
//! [`collapse_separators`], so none of them has to deal with periods,
//! commas or repeated whitespace.

use std::sync::LazyLock;

use civic_link_config::SegmenterConfig;
use regex::Regex;

use crate::SegmenterError;

/// Runs of separators that are treated as a single space.
static SEPARATORS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,.;]+").expect("valid regex"));

/// State, provincial and regional road acronyms (`SS`, `S P`, `SR`).
static ROAD_ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bS\s*[SPR]\b").expect("valid regex"));

/// Kilometre marker, standalone or glued to its figure (`KM 12`, `KM12`).
static KILOMETRE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bKM(?:\b|\d)").expect("valid regex"));

/// Explicit house-number marker followed by digits (`N 12`, `N° 12`, `N°12`).
pub(crate) static EXPLICIT_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bN(?:[°º]\s*|\s+)(\d+[A-Z]?)").expect("valid regex")
});

/// First standalone number token.
pub(crate) static BARE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+[A-Z]?").expect("valid regex"));

/// Dangling number marker left at the end of the street part.
pub(crate) static TRAILING_NUMBER_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bN[°º]?\s*$").expect("valid regex"));

/// Leading numeric house-number head with an optional letter.
pub(crate) static HOUSE_NUMBER_HEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[A-Z]?)(.*)$").expect("valid regex"));

/// Hyphen or slash suffix right after the head (`12/A`, `12-BIS`).
pub(crate) static HOUSE_NUMBER_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-/]\s*([A-Z0-9]+)(.*)$").expect("valid regex"));

/// Staircase (`SC A`, `SCALA B`).
pub(crate) static STAIRCASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSC(?:ALA)?\s+([^\s,;]+)").expect("valid regex"));

/// Hyphenated staircase shorthand (`SC-B`).
pub(crate) static STAIRCASE_SHORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSC\s*-\s*([A-Z0-9]+)").expect("valid regex"));

/// Floor (`PI 2`, `PIANO T`).
pub(crate) static FLOOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPI(?:ANO)?\s+([^\s,;]+)").expect("valid regex"));

/// Unit or apartment (`INT 3`, `INTERNO 12`).
pub(crate) static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bINT(?:ERNO)?\s+([^\s,;]+)").expect("valid regex"));

/// Replaces `,` `.` `;` runs with a space and collapses whitespace.
#[must_use]
pub fn collapse_separators(text: &str) -> String {
    let spaced = SEPARATORS_RE.replace_all(text, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Patterns built from a [`SegmenterConfig`].
#[derive(Debug, Clone)]
pub struct MarkerSet {
    /// Any no-number marker as a whole token.
    pub(crate) no_number: Regex,
    /// A day number followed by a month name (`4 NOVEMBRE`).
    pub(crate) date: Regex,
}

impl MarkerSet {
    /// Compiles the configured markers.
    ///
    /// # Errors
    ///
    /// Returns [`SegmenterError::EmptyVocabulary`] if the no-number markers
    /// or month names are all blank, or [`SegmenterError::Pattern`] if a
    /// pattern fails to compile.
    pub fn new(config: &SegmenterConfig) -> Result<Self, SegmenterError> {
        let markers = alternation(&config.no_number_markers).ok_or(
            SegmenterError::EmptyVocabulary {
                field: "no_number_markers",
            },
        )?;
        let months = alternation(&config.month_names).ok_or(SegmenterError::EmptyVocabulary {
            field: "month_names",
        })?;

        Ok(Self {
            no_number: compile("no_number", &format!(r"\b(?:{markers})\b"))?,
            date: compile("date", &format!(r"\b\d{{1,2}}\s+(?:{months})\b"))?,
        })
    }

    /// Returns `true` for a road-and-kilometre reference with no house
    /// number marker of either kind (`SS 16 KM 12`).
    #[must_use]
    pub fn is_route_reference(&self, text: &str) -> bool {
        ROAD_ACRONYM_RE.is_match(text)
            && KILOMETRE_RE.is_match(text)
            && !EXPLICIT_NUMBER_RE.is_match(text)
            && !self.no_number.is_match(text)
    }
}

/// Builds a regex alternation of escaped, cleaned words, longest first.
/// Returns `None` when every word is blank.
fn alternation(words: &[String]) -> Option<String> {
    let mut cleaned: Vec<String> = words
        .iter()
        .map(|word| collapse_separators(&word.to_uppercase()))
        .filter(|word| !word.is_empty())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    cleaned.dedup();

    Some(
        cleaned
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, SegmenterError> {
    Regex::new(pattern).map_err(|source| SegmenterError::Pattern { name, source })
}
