#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street-code gazetteer matching.
//!
//! A gazetteer table lists, per municipality, every street with its code.
//! [`build_entries`] turns its rows into [`GazetteerEntry`] values,
//! [`StreetCodeResolver`] indexes them and resolves free-text streets to
//! codes, and [`assign_codes`] runs the resolver over a whole address
//! table.

pub mod assign;
pub mod entry;
pub mod index;
pub mod resolver;

pub use assign::{CodeAssignment, CodeAssignments, FlagTally, assign_codes};
pub use entry::{GazetteerColumns, GazetteerEntry, build_entries};
pub use index::StreetIndex;
pub use resolver::{BestCandidates, StreetCodeResolver, select_best};

/// Errors from building a gazetteer or reading an address table.
#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    /// The gazetteer table has no rows.
    #[error("Gazetteer table has no rows")]
    EmptyTable,

    /// Required columns are missing.
    #[error("Missing required column(s): {}", .columns.join(", "))]
    MissingColumns {
        /// Names of the missing columns.
        columns: Vec<String>,
    },

    /// Every gazetteer row lacked a municipality, code or street.
    #[error("Gazetteer table has no usable rows")]
    NoUsableRows,

    /// The address table has no municipality column.
    #[error("Address table has no column mentioning '{}'", civic_link_table::MUNICIPALITY_COLUMN_KEYWORD)]
    NoMunicipalityColumn,
}
