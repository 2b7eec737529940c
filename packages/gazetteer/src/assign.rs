//! Street-code assignment over a whole address table.

use civic_link_address_models::{CodeFlag, MatchStatus, Resolution};
use civic_link_normalize::{first_non_empty, sanitize};
use civic_link_table::Table;
use serde::{Deserialize, Serialize};

use crate::GazetteerError;
use crate::resolver::StreetCodeResolver;

/// Street code assigned to one address row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAssignment {
    /// Assigned code, empty unless `flag` is a match.
    pub code: String,
    pub flag: CodeFlag,
    /// Why no code was assigned; `None` for matches.
    pub reason: Option<MatchStatus>,
}

impl From<Resolution> for CodeAssignment {
    fn from(resolution: Resolution) -> Self {
        let flag = CodeFlag::from(resolution.status);
        Self {
            code: resolution.code,
            flag,
            reason: (flag == CodeFlag::NotFound).then_some(resolution.status),
        }
    }
}

/// Count of assignments per [`CodeFlag`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagTally {
    pub certain: usize,
    pub similar: usize,
    pub not_found: usize,
}

impl FlagTally {
    /// Counts one assignment.
    pub const fn record(&mut self, flag: CodeFlag) {
        match flag {
            CodeFlag::Certain => self.certain += 1,
            CodeFlag::Similar => self.similar += 1,
            CodeFlag::NotFound => self.not_found += 1,
        }
    }

    /// Total number of assignments counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.certain + self.similar + self.not_found
    }
}

/// Per-row assignments of an address table, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAssignments {
    pub rows: Vec<CodeAssignment>,
    pub tally: FlagTally,
}

/// Resolves the street code of every row of an address table.
///
/// The municipality of a row is the first non-empty value among the
/// columns whose header mentions it (see
/// [`Table::municipality_columns`]); the street is read from
/// `street_column`.
///
/// # Errors
///
/// * [`GazetteerError::NoMunicipalityColumn`] if no header mentions the
///   municipality
/// * [`GazetteerError::MissingColumns`] if `street_column` is missing
pub fn assign_codes(
    resolver: &StreetCodeResolver,
    table: &Table,
    street_column: &str,
) -> Result<CodeAssignments, GazetteerError> {
    let municipality_columns = table.municipality_columns();
    if municipality_columns.is_empty() {
        return Err(GazetteerError::NoMunicipalityColumn);
    }
    let street_col = table
        .column(street_column)
        .ok_or_else(|| GazetteerError::MissingColumns {
            columns: vec![street_column.to_string()],
        })?;

    let mut assignments = CodeAssignments::default();
    for row in table.rows() {
        let municipality = first_non_empty(municipality_columns.iter().map(|&col| row.get(col)));
        let street = sanitize(row.get(street_col));

        let assignment = CodeAssignment::from(resolver.resolve_text(&municipality, &street));
        assignments.tally.record(assignment.flag);
        assignments.rows.push(assignment);
    }

    let tally = &assignments.tally;
    log::info!(
        "Assigned street codes to {} row(s): certain={} similar={} not_found={}",
        tally.total(),
        tally.certain,
        tally.similar,
        tally.not_found
    );

    Ok(assignments)
}
