//! Value sanitizing and key normalization.
//!
//! Two steps are applied to every raw cell before it takes part in any
//! match:
//!
//! 1. [`sanitize`] turns whatever the source table held into clean text:
//!    trimmed of ordinary and invisible whitespace, with numeric artifacts
//!    like `"12.0"` rendered as `"12"`.
//! 2. [`normalize`] reduces text to a [`NormalizedKey`]: uppercase with
//!    everything outside `[A-Z0-9]` removed. Two values are considered the
//!    same when their keys are equal.

use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Characters outside the normalized key alphabet.
static NON_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Z0-9]+").expect("valid regex"));

/// Integral values stored as decimals by spreadsheet tools (`12.0`).
static INTEGRAL_DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?[0-9]+)\.0+$").expect("valid regex"));

/// Invisible or no-break characters trimmed in addition to whitespace.
const EXTRA_TRIM_CHARS: &[char] = &[
    '\u{00a0}', '\u{2007}', '\u{202f}', '\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}',
];

/// An uppercase `[A-Z0-9]*` equality key.
///
/// Only [`normalize`] constructs keys, so every key is already in normal
/// form and normalizing its text again yields the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// The key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the key of a value with no alphanumerics.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Cleans a raw cell value into plain text.
///
/// Trims ordinary whitespace plus no-break and zero-width characters from
/// both ends, and renders integral decimals (`"12.0"`, `"-3.00"`) as
/// integers. Leading zeros are preserved, since codes like `"012"` are
/// meaningful.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || EXTRA_TRIM_CHARS.contains(&c));

    INTEGRAL_DECIMAL_RE.captures(trimmed).map_or_else(
        || trimmed.to_string(),
        |caps| caps[1].to_string(),
    )
}

/// Sanitizes `values` in order and returns the first non-empty one, or an
/// empty string.
#[must_use]
pub fn first_non_empty<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(sanitize)
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Reduces text to its [`NormalizedKey`].
///
/// Uppercases, then drops every character outside ASCII `[A-Z0-9]`,
/// including spaces, punctuation and accented letters.
#[must_use]
pub fn normalize(text: &str) -> NormalizedKey {
    if text.is_empty() {
        return NormalizedKey::default();
    }
    let upper = text.to_uppercase();
    NormalizedKey(NON_KEY_RE.replace_all(&upper, "").into_owned())
}
