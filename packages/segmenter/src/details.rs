//! Staircase, floor and unit extraction from the text after the house
//! number.

use regex::Regex;

use crate::markers::{FLOOR_RE, STAIRCASE_RE, STAIRCASE_SHORT_RE, UNIT_RE, collapse_separators};

/// Detail fields pulled out of a house-number tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    pub staircase: String,
    pub floor: String,
    pub unit: String,
    /// Text no marker accounted for, separators collapsed.
    pub leftover: String,
}

/// Extracts staircase, floor and unit from `tail`, in that order.
///
/// Each extraction removes its matched span before the next one runs. A
/// missing marker leaves its field empty and does not affect the others.
#[must_use]
pub fn extract_details(tail: &str) -> Details {
    let mut rest = collapse_separators(tail);

    let mut staircase = take(&STAIRCASE_RE, &mut rest);
    if staircase.is_empty() {
        staircase = take(&STAIRCASE_SHORT_RE, &mut rest);
    }
    let floor = take(&FLOOR_RE, &mut rest);
    let unit = take(&UNIT_RE, &mut rest);

    Details {
        staircase,
        floor,
        unit,
        leftover: collapse_separators(&rest),
    }
}

/// Removes the first match of `pattern` from `source` and returns its
/// first capture group, or an empty string when nothing matches.
fn take(pattern: &Regex, source: &mut String) -> String {
    let Some((value, span)) = pattern.captures(source).map(|caps| {
        let span = caps.get(0).map_or(0..0, |whole| whole.range());
        (caps[1].trim().to_string(), span)
    }) else {
        return String::new();
    };

    source.replace_range(span, " ");
    *source = source.split_whitespace().collect::<Vec<_>>().join(" ");
    value
}
