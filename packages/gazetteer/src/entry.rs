//! Gazetteer rows turned into matchable entries.

use civic_link_normalize::{AliasTable, NormalizedKey, StreetPrefixStripper, normalize, sanitize};
use civic_link_table::Table;
use serde::{Deserialize, Serialize};

use crate::GazetteerError;

/// One street of the reference gazetteer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    /// Canonical municipality key.
    pub municipality_key: NormalizedKey,
    /// Street code.
    pub code: String,
    /// Street text with its street-type prefix removed.
    pub cleaned_street: String,
    /// Key of `cleaned_street`.
    pub normalized_street: NormalizedKey,
}

/// Header names of the gazetteer columns, matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerColumns {
    pub municipality: String,
    /// Street type (`VIA`, `PIAZZA`).
    pub toponym: String,
    /// Street name proper.
    pub description: String,
    pub code: String,
}

impl Default for GazetteerColumns {
    fn default() -> Self {
        Self {
            municipality: "DESCRIZIONE_COMUNE".to_string(),
            toponym: "TOPONIMO".to_string(),
            description: "DESCRIZIONE_VIA".to_string(),
            code: "CODICE_VIA".to_string(),
        }
    }
}

/// Builds gazetteer entries from a reference table.
///
/// The street text of a row is its toponym and description joined with a
/// space. Rows whose municipality, code or street text is empty are
/// skipped. Rows whose street is made only of street-type words are kept
/// but can never match, since their cleaned street is empty.
///
/// # Errors
///
/// * [`GazetteerError::EmptyTable`] if the table has no rows
/// * [`GazetteerError::MissingColumns`] if a column in `columns` is missing
/// * [`GazetteerError::NoUsableRows`] if every row was skipped
pub fn build_entries(
    table: &Table,
    columns: &GazetteerColumns,
    aliases: &AliasTable,
    stripper: &StreetPrefixStripper,
) -> Result<Vec<GazetteerEntry>, GazetteerError> {
    if table.is_empty() {
        return Err(GazetteerError::EmptyTable);
    }

    let located = table
        .locate_columns(&[
            columns.municipality.as_str(),
            columns.toponym.as_str(),
            columns.description.as_str(),
            columns.code.as_str(),
        ])
        .map_err(|columns| GazetteerError::MissingColumns { columns })?;
    let (municipality_col, toponym_col, description_col, code_col) =
        (located[0], located[1], located[2], located[3]);

    let mut entries = Vec::with_capacity(table.len());
    for row in table.rows() {
        let municipality_key = aliases.canonical(row.get(municipality_col));
        let code = sanitize(row.get(code_col));
        if municipality_key.is_empty() || code.is_empty() {
            continue;
        }

        let street_text = [sanitize(row.get(toponym_col)), sanitize(row.get(description_col))]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if street_text.is_empty() {
            continue;
        }

        let cleaned_street = stripper.strip(&street_text);
        let normalized_street = normalize(&cleaned_street);
        entries.push(GazetteerEntry {
            municipality_key,
            code,
            cleaned_street,
            normalized_street,
        });
    }

    log::debug!(
        "Skipped {} of {} gazetteer row(s)",
        table.len() - entries.len(),
        table.len()
    );

    if entries.is_empty() {
        return Err(GazetteerError::NoUsableRows);
    }

    Ok(entries)
}
