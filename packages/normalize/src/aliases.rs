//! Municipality alias resolution.
//!
//! Municipalities appear under several official or colloquial names
//! (`BOLZANO`, `BOZEN`, `BOLZANO/BOZEN`). An [`AliasTable`] maps every
//! known alias key to one canonical key, so equal municipalities compare
//! equal whatever name each source used.
//!
//! Tables are built from rows carrying an `alias` and a `canonical`
//! column. A built-in table ships with the crate; a user table merged
//! after it overrides conflicting aliases.

use std::collections::HashMap;

use civic_link_table::{Table, TableError};

use crate::normalize::{NormalizedKey, normalize, sanitize};

/// The built-in alias table, embedded at compile time.
const BUILTIN_ALIASES_CSV: &str = include_str!("../data/municipality_aliases.csv");

const ALIAS_COLUMN: &str = "alias";
const CANONICAL_COLUMN: &str = "canonical";

/// Immutable alias key → canonical key mapping.
///
/// An empty table resolves every name to its plain normalized key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    lookup: HashMap<NormalizedKey, NormalizedKey>,
}

impl AliasTable {
    /// The table parsed from the built-in alias list.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded list is malformed.
    pub fn builtin() -> Result<Self, AliasError> {
        Ok(AliasTableBuilder::new().merge_builtin()?.build())
    }

    /// Builds the table from the built-in list (when `include_builtin`)
    /// followed by an optional user table.
    ///
    /// # Errors
    ///
    /// Returns [`AliasError::MissingColumns`] if a table lacks the `alias`
    /// or `canonical` column.
    pub fn load(include_builtin: bool, user: Option<&Table>) -> Result<Self, AliasError> {
        let mut builder = AliasTableBuilder::new();
        if include_builtin {
            builder = builder.merge_builtin()?;
        }
        if let Some(table) = user {
            builder = builder.merge(table)?;
        }

        let aliases = builder.build();
        log::info!("Loaded {} municipality alias key(s)", aliases.len());
        Ok(aliases)
    }

    /// Resolves a free-text municipality name to its canonical key.
    ///
    /// Unknown names resolve to their own normalized key; empty input
    /// resolves to the empty key.
    #[must_use]
    pub fn canonical(&self, text: &str) -> NormalizedKey {
        let key = normalize(&sanitize(text));
        if key.is_empty() {
            return key;
        }
        self.lookup.get(&key).cloned().unwrap_or(key)
    }

    /// Number of alias keys, canonical self-mappings included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns `true` if no alias is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }
}

/// Merges alias tables in order into an [`AliasTable`].
#[derive(Debug, Default)]
pub struct AliasTableBuilder {
    lookup: HashMap<NormalizedKey, NormalizedKey>,
}

impl AliasTableBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the built-in alias list.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded list is malformed.
    pub fn merge_builtin(self) -> Result<Self, AliasError> {
        let table = Table::from_csv_str(BUILTIN_ALIASES_CSV)?;
        self.merge(&table)
    }

    /// Merges one alias table.
    ///
    /// Each row maps its alias to its canonical name, replacing any earlier
    /// mapping of that alias, and maps the canonical name to itself unless
    /// it is already mapped. Rows where either side normalizes to nothing
    /// are skipped. A table with headers but no rows contributes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AliasError::MissingColumns`] if the `alias` or `canonical`
    /// column is missing (matched case-insensitively).
    pub fn merge(mut self, table: &Table) -> Result<Self, AliasError> {
        if table.is_empty() {
            log::warn!("Alias table has no rows; nothing merged");
            return Ok(self);
        }

        let columns = table
            .locate_columns(&[ALIAS_COLUMN, CANONICAL_COLUMN])
            .map_err(|columns| AliasError::MissingColumns { columns })?;
        let (alias_col, canonical_col) = (columns[0], columns[1]);

        let mut merged = 0usize;
        for row in table.rows() {
            let alias = normalize(&sanitize(row.get(alias_col)));
            let canonical = normalize(&sanitize(row.get(canonical_col)));
            if alias.is_empty() || canonical.is_empty() {
                continue;
            }

            self.lookup
                .entry(canonical.clone())
                .or_insert_with(|| canonical.clone());
            self.lookup.insert(alias, canonical);
            merged += 1;
        }

        log::debug!("Merged {merged} of {} alias row(s)", table.len());
        Ok(self)
    }

    /// Freezes the merged mapping.
    #[must_use]
    pub fn build(self) -> AliasTable {
        AliasTable {
            lookup: self.lookup,
        }
    }
}

/// Errors from building an [`AliasTable`].
#[derive(Debug, thiserror::Error)]
pub enum AliasError {
    /// The table lacks a required column.
    #[error("Alias table must contain the columns 'alias' and 'canonical'; missing: {}", .columns.join(", "))]
    MissingColumns {
        /// Names of the missing columns.
        columns: Vec<String>,
    },

    /// The alias table could not be read.
    #[error("Alias table error: {0}")]
    Table(#[from] TableError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_plain_normalization() {
        let aliases = AliasTable::default();
        assert_eq!(aliases.canonical(" Bozen ").as_str(), "BOZEN");
        assert!(aliases.canonical("").is_empty());
    }

    #[test]
    fn builtin_resolves_bilingual_names() {
        let aliases = AliasTable::builtin().unwrap();
        assert_eq!(aliases.canonical("Bozen"), aliases.canonical("BOLZANO"));
        assert_eq!(aliases.canonical("Bolzano/Bozen").as_str(), "BOLZANO");
        assert_eq!(aliases.canonical("Reggio Emilia").as_str(), "REGGIONELLEMILIA");
    }

    #[test]
    fn builtin_bridges_accented_spellings() {
        let aliases = AliasTable::builtin().unwrap();
        assert_eq!(aliases.canonical("Forlì"), aliases.canonical("FORLI'"));
        assert_eq!(aliases.canonical("Cantù").as_str(), "CANTU");
    }

    #[test]
    fn canonical_maps_to_itself() {
        let table = Table::from_slices(&["alias", "canonical"], &[&["Bozen", "Bolzano"]]);
        let aliases = AliasTableBuilder::new().merge(&table).unwrap().build();
        assert_eq!(aliases.canonical("BOLZANO").as_str(), "BOLZANO");
        assert_eq!(aliases.len(), 2);
    }

    #[test]
    fn unknown_name_falls_back_to_key() {
        let aliases = AliasTable::builtin().unwrap();
        assert_eq!(aliases.canonical("Castel San Pietro").as_str(), "CASTELSANPIETRO");
    }

    #[test]
    fn later_table_wins_on_conflicting_alias() {
        let first = Table::from_slices(&["alias", "canonical"], &[&["REGGIO", "REGGIO EMILIA"]]);
        let second =
            Table::from_slices(&["ALIAS", "Canonical"], &[&["REGGIO", "REGGIO CALABRIA"]]);
        let aliases = AliasTableBuilder::new()
            .merge(&first)
            .unwrap()
            .merge(&second)
            .unwrap()
            .build();
        assert_eq!(aliases.canonical("Reggio").as_str(), "REGGIOCALABRIA");
    }

    #[test]
    fn self_mapping_does_not_override_alias() {
        let first = Table::from_slices(&["alias", "canonical"], &[&["MERANO", "MERAN"]]);
        let second = Table::from_slices(&["alias", "canonical"], &[&["X", "MERANO"]]);
        let aliases = AliasTableBuilder::new()
            .merge(&first)
            .unwrap()
            .merge(&second)
            .unwrap()
            .build();
        assert_eq!(aliases.canonical("MERANO").as_str(), "MERAN");
    }

    #[test]
    fn skips_rows_with_blank_side() {
        let table = Table::from_slices(&["alias", "canonical"], &[&["", "ROMA"], &["URBE", " "]]);
        let aliases = AliasTableBuilder::new().merge(&table).unwrap().build();
        assert!(aliases.is_empty());
    }

    #[test]
    fn rejects_table_without_required_columns() {
        let table = Table::from_slices(&["nome", "canonical"], &[&["A", "B"]]);
        let err = AliasTableBuilder::new().merge(&table).unwrap_err();
        match err {
            AliasError::MissingColumns { columns } => assert_eq!(columns, vec!["alias"]),
            AliasError::Table(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn rowless_table_is_not_an_error() {
        let table = Table::from_slices(&["whatever"], &[]);
        let aliases = AliasTable::load(false, Some(&table)).unwrap();
        assert!(aliases.is_empty());
    }

    #[test]
    fn user_table_overrides_builtin() {
        let user = Table::from_csv_str("alias;canonical\nBOZEN;BOLZANO ALTO ADIGE\n").unwrap();
        let aliases = AliasTable::load(true, Some(&user)).unwrap();
        assert_eq!(aliases.canonical("Bozen").as_str(), "BOLZANOALTOADIGE");
        assert_eq!(aliases.canonical("Meran").as_str(), "MERANO");
    }
}
