//! Comparison of two address tables joined on a shared key column.

use std::collections::HashMap;

use civic_link_address_models::{AddressLayout, FieldFlags};
use civic_link_normalize::{first_non_empty, sanitize};
use civic_link_table::{Row, Table};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::CompareError;
use crate::record::{AddressFields, RecordComparator};

/// Default name of the join key column.
pub const DEFAULT_KEY_COLUMN: &str = "match";

/// Separator between detail values folded into one field.
const DETAILS_SEPARATOR: &str = " | ";

/// Which of the two compared tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// One joined record pair and its verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparedRow {
    /// Sanitized join key.
    pub key: String,
    /// Data-row index in the left table.
    pub left_row: usize,
    /// Data-row index in the right table.
    pub right_row: usize,
    pub left: AddressFields,
    pub right: AddressFields,
    pub flags: FieldFlags,
}

/// Column positions of one table for an [`AddressLayout`].
struct ColumnPositions {
    key: usize,
    municipality: Vec<usize>,
    street: usize,
    house_number: usize,
    details: Vec<usize>,
}

impl ColumnPositions {
    fn locate(
        table: &Table,
        layout: AddressLayout,
        key_column: &str,
        side: Side,
    ) -> Result<Self, CompareError> {
        let key = table
            .column(key_column)
            .ok_or_else(|| CompareError::MissingKeyColumn {
                side,
                column: key_column.to_string(),
            })?;

        let municipality = table.municipality_columns();
        if municipality.is_empty() {
            return Err(CompareError::NoMunicipalityColumn { side });
        }

        let mut wanted = vec![layout.street_column(), layout.house_number_column()];
        wanted.extend_from_slice(layout.detail_columns());
        let located = table
            .locate_columns(&wanted)
            .map_err(|columns| CompareError::MissingLayoutColumns {
                side,
                layout,
                columns,
            })?;

        Ok(Self {
            key,
            municipality,
            street: located[0],
            house_number: located[1],
            details: located[2..].to_vec(),
        })
    }

    fn key(&self, row: Row<'_>) -> String {
        sanitize(row.get(self.key))
    }

    fn fields(&self, row: Row<'_>) -> AddressFields {
        AddressFields {
            municipality: first_non_empty(self.municipality.iter().map(|&col| row.get(col))),
            street: sanitize(row.get(self.street)),
            house_number: sanitize(row.get(self.house_number)),
            details: compose_details(self.details.iter().map(|&col| row.get(col))),
        }
    }
}

/// Joins the non-empty sanitized values with `" | "`.
#[must_use]
pub fn compose_details<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values
        .into_iter()
        .map(sanitize)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(DETAILS_SEPARATOR)
}

/// Compares every pair of rows sharing a key.
///
/// Each left row is paired with every right row whose sanitized key equals
/// its own, in left-then-right row order. Rows with an empty key are not
/// joined.
///
/// # Errors
///
/// * [`CompareError::MissingKeyColumn`] if either table lacks `key_column`
/// * [`CompareError::NoMunicipalityColumn`] if either table has no
///   municipality column
/// * [`CompareError::MissingLayoutColumns`] if either table lacks a column
///   of `layout`
/// * [`CompareError::NoCommonKeys`] if no key appears in both tables
pub fn compare_tables(
    comparator: &RecordComparator,
    left: &Table,
    right: &Table,
    layout: AddressLayout,
    key_column: &str,
) -> Result<Vec<ComparedRow>, CompareError> {
    let left_layout = ColumnPositions::locate(left, layout, key_column, Side::Left)?;
    let right_layout = ColumnPositions::locate(right, layout, key_column, Side::Right)?;

    let mut right_by_key: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, row) in right.rows().enumerate() {
        let key = right_layout.key(row);
        if !key.is_empty() {
            right_by_key.entry(key).or_default().push(index);
        }
    }

    let mut compared = Vec::new();
    for (left_index, left_row) in left.rows().enumerate() {
        let key = left_layout.key(left_row);
        let Some(matches) = right_by_key.get(&key) else {
            continue;
        };

        let left_fields = left_layout.fields(left_row);
        for &right_index in matches {
            let Some(right_row) = right.row(right_index) else {
                continue;
            };
            let right_fields = right_layout.fields(right_row);
            let flags = comparator.compare(&left_fields, &right_fields);
            compared.push(ComparedRow {
                key: key.clone(),
                left_row: left_index,
                right_row: right_index,
                left: left_fields.clone(),
                right: right_fields,
                flags,
            });
        }
    }

    if compared.is_empty() {
        return Err(CompareError::NoCommonKeys {
            column: key_column.to_string(),
        });
    }

    log::info!(
        "Compared {} record pair(s) in {layout} layout ({} left row(s), {} right row(s))",
        compared.len(),
        left.len(),
        right.len()
    );

    Ok(compared)
}

#[cfg(test)]
mod tests {
    use civic_link_address_models::{AggregateVerdict, ComparisonVerdict};
    use civic_link_config::MatchingConfig;
    use civic_link_normalize::{AliasTable, StreetPrefixStripper};

    use super::*;

    fn comparator() -> RecordComparator {
        RecordComparator::new(
            &MatchingConfig::default(),
            AliasTable::builtin().unwrap(),
            StreetPrefixStripper::default(),
        )
    }

    const COMPACT_HEADERS: &[&str] = &[
        "match",
        "comune",
        "indirizzo_diviso",
        "civico_diviso",
        "specifica_civico_diviso",
    ];

    #[test]
    fn composes_details_skipping_blanks() {
        assert_eq!(compose_details(["A", "", " 3 ", "2.0"]), "A | 3 | 2");
        assert_eq!(compose_details(["", " "]), "");
    }

    #[test]
    fn joins_rows_on_key_in_left_order() {
        let left = Table::from_slices(
            COMPACT_HEADERS,
            &[
                &["2", "Merano", "Via Roma", "12", ""],
                &["1", "Bolzano", "Via Museo", "3", "INT 4"],
                &["9", "Trento", "Via Manci", "1", ""],
            ],
        );
        let right = Table::from_slices(
            COMPACT_HEADERS,
            &[
                &["1", "Bozen", "Museo", "3", "INT 4"],
                &["2.0", "Meran", "V. Roma", "14", ""],
            ],
        );

        let rows = compare_tables(&comparator(), &left, &right, AddressLayout::Compact, "match")
            .unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].key, "2");
        assert_eq!((rows[0].left_row, rows[0].right_row), (0, 1));
        assert_eq!(rows[0].flags.municipality, ComparisonVerdict::Equal);
        assert_eq!(rows[0].flags.street, ComparisonVerdict::Equal);
        assert_eq!(rows[0].flags.house_number, ComparisonVerdict::Different);
        assert_eq!(rows[0].flags.overall, AggregateVerdict::Difference);

        assert_eq!(rows[1].key, "1");
        assert_eq!(rows[1].flags.overall, AggregateVerdict::Coincidence);
    }

    #[test]
    fn duplicate_keys_pair_every_combination() {
        let left = Table::from_slices(
            COMPACT_HEADERS,
            &[&["7", "Trento", "Via Roma", "1", ""], &["7", "Trento", "Via Roma", "2", ""]],
        );
        let right = Table::from_slices(
            COMPACT_HEADERS,
            &[&["7", "Trento", "Via Roma", "1", ""], &["7", "Trento", "Via Roma", "2", ""]],
        );
        let rows = compare_tables(&comparator(), &left, &right, AddressLayout::Compact, "match")
            .unwrap();
        let pairs: Vec<(usize, usize)> = rows.iter().map(|r| (r.left_row, r.right_row)).collect();
        assert_eq!(pairs, [(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn detailed_layout_folds_detail_columns() {
        let headers = &[
            "MATCH",
            "Comune_Residenza",
            "indirizzo",
            "civico",
            "scala",
            "interno",
            "piano",
            "estensione",
        ];
        let left = Table::from_slices(headers, &[&["1", "Trento", "Via Roma", "12", "A", "3", "", ""]]);
        let right = Table::from_slices(headers, &[&["1", "Trento", "Via Roma", "12", "A", "", "", ""]]);

        let rows = compare_tables(&comparator(), &left, &right, AddressLayout::Detailed, "match")
            .unwrap();
        assert_eq!(rows[0].left.details, "A | 3");
        assert_eq!(rows[0].right.details, "A");
        assert_eq!(rows[0].flags.details, ComparisonVerdict::Different);
    }

    #[test]
    fn municipality_falls_back_to_next_column() {
        let headers = &[
            "match",
            "comune_residenza",
            "comune_nascita",
            "indirizzo_diviso",
            "civico_diviso",
            "specifica_civico_diviso",
        ];
        let left = Table::from_slices(headers, &[&["1", "", "Trento", "Via Roma", "1", ""]]);
        let right = Table::from_slices(headers, &[&["1", "Trento", "", "Via Roma", "1", ""]]);
        let rows = compare_tables(&comparator(), &left, &right, AddressLayout::Compact, "match")
            .unwrap();
        assert_eq!(rows[0].left.municipality, "Trento");
        assert_eq!(rows[0].flags.municipality, ComparisonVerdict::Equal);
    }

    #[test]
    fn empty_keys_are_not_joined() {
        let left = Table::from_slices(COMPACT_HEADERS, &[&["", "Trento", "Via Roma", "1", ""]]);
        let right = Table::from_slices(COMPACT_HEADERS, &[&[" ", "Trento", "Via Roma", "1", ""]]);
        let err = compare_tables(&comparator(), &left, &right, AddressLayout::Compact, "match")
            .unwrap_err();
        assert!(matches!(err, CompareError::NoCommonKeys { .. }));
    }

    #[test]
    fn reports_missing_key_column_with_side() {
        let left = Table::from_slices(COMPACT_HEADERS, &[]);
        let right = Table::from_slices(&["id", "comune"], &[]);
        let err = compare_tables(&comparator(), &left, &right, AddressLayout::Compact, "match")
            .unwrap_err();
        match err {
            CompareError::MissingKeyColumn { side, column } => {
                assert_eq!(side, Side::Right);
                assert_eq!(column, "match");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reports_missing_municipality_column() {
        let left = Table::from_slices(
            &["match", "indirizzo_diviso", "civico_diviso", "specifica_civico_diviso"],
            &[],
        );
        let err = compare_tables(&comparator(), &left, &left, AddressLayout::Compact, "match")
            .unwrap_err();
        assert!(matches!(
            err,
            CompareError::NoMunicipalityColumn { side: Side::Left }
        ));
    }

    #[test]
    fn reports_missing_layout_columns() {
        let left = Table::from_slices(COMPACT_HEADERS, &[]);
        let err = compare_tables(&comparator(), &left, &left, AddressLayout::Detailed, "match")
            .unwrap_err();
        match err {
            CompareError::MissingLayoutColumns {
                side,
                layout,
                columns,
            } => {
                assert_eq!(side, Side::Left);
                assert_eq!(layout, AddressLayout::Detailed);
                assert_eq!(
                    columns,
                    ["indirizzo", "civico", "scala", "interno", "piano", "estensione"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
