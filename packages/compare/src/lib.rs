#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuzzy comparison of addresses from two independent sources.
//!
//! [`FuzzyValueComparator`] judges one field pair, [`RecordComparator`]
//! judges the four fields of an address and aggregates them, and
//! [`compare_tables`] joins two tables on a key column and compares every
//! joined pair.

pub mod record;
pub mod tables;
pub mod verdict;

pub use record::{AddressFields, RecordComparator};
pub use tables::{ComparedRow, DEFAULT_KEY_COLUMN, Side, compare_tables, compose_details};
pub use verdict::{FuzzyValueComparator, aggregate};

/// Errors from comparing two address tables.
#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    /// A table lacks the join key column.
    #[error("{side} table has no '{column}' column")]
    MissingKeyColumn { side: Side, column: String },

    /// A table has no municipality column.
    #[error(
        "{side} table has no column mentioning '{}'",
        civic_link_table::MUNICIPALITY_COLUMN_KEYWORD
    )]
    NoMunicipalityColumn { side: Side },

    /// A table lacks columns required by the address layout.
    #[error("{side} table is missing {layout} column(s): {}", .columns.join(", "))]
    MissingLayoutColumns {
        side: Side,
        layout: civic_link_address_models::AddressLayout,
        columns: Vec<String>,
    },

    /// No non-empty key appears in both tables.
    #[error("The tables share no value of the '{column}' column")]
    NoCommonKeys { column: String },
}
