#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory string tables.
//!
//! Every build operation of the engine (gazetteer, alias table, two-table
//! comparison) consumes rows of text cells addressed by column header. A
//! [`Table`] holds exactly that: a header row plus data rows, all as
//! strings, with case-insensitive header lookup. Cell values are kept raw;
//! sanitizing them is the consumer's job.
//!
//! [`Table::from_csv_reader`] reads delimited text, auto-detecting a `,`,
//! `;` or tab delimiter from the header line.

use std::io::Read;
use std::path::Path;

/// Header keyword that marks a column as holding a municipality name.
pub const MUNICIPALITY_COLUMN_KEYWORD: &str = "comune";

/// Delimiters considered when sniffing a CSV header line.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// A header row plus data rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed data row of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Returns the cell at `index`, or `""` when the row is shorter.
    #[must_use]
    pub fn get(&self, index: usize) -> &'a str {
        self.cells.get(index).map_or("", String::as_str)
    }
}

impl Table {
    /// Creates a table from owned headers and rows.
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Convenience constructor from string slices, mostly for fixtures.
    #[must_use]
    pub fn from_slices(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(ToString::to_string).collect(),
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    /// Returns a copy of the table with the `headers` columns filled from
    /// `values`, one item per data row.
    ///
    /// A header that already exists (ignoring case) is overwritten in place;
    /// the others are appended in order. Rows are fitted to the header width
    /// first, and missing values read as empty cells.
    #[must_use]
    pub fn with_columns(
        &self,
        headers: &[&str],
        values: impl IntoIterator<Item = Vec<String>>,
    ) -> Self {
        let mut all_headers = self.headers.clone();
        let targets: Vec<usize> = headers
            .iter()
            .map(|name| {
                self.column(name).unwrap_or_else(|| {
                    all_headers.push((*name).to_string());
                    all_headers.len() - 1
                })
            })
            .collect();

        let mut values = values.into_iter();
        let rows = self
            .rows
            .iter()
            .map(|cells| {
                let mut row = cells.clone();
                row.resize(all_headers.len(), String::new());
                let fill = values.next().unwrap_or_default();
                for (&target, value) in targets.iter().zip(fill) {
                    row[target] = value;
                }
                row
            })
            .collect();

        Self::new(all_headers, rows)
    }

    /// Header names in column order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the data rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }

    /// Returns the data row at `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row { cells })
    }

    /// Finds a column by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers
            .iter()
            .position(|header| header.trim().to_lowercase() == wanted)
    }

    /// Returns every column whose header contains `keyword`, ignoring case.
    #[must_use]
    pub fn columns_containing(&self, keyword: &str) -> Vec<usize> {
        let keyword = keyword.to_lowercase();
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, header)| header.to_lowercase().contains(&keyword))
            .map(|(index, _)| index)
            .collect()
    }

    /// Columns whose header mentions the municipality
    /// ([`MUNICIPALITY_COLUMN_KEYWORD`]), in column order.
    #[must_use]
    pub fn municipality_columns(&self) -> Vec<usize> {
        self.columns_containing(MUNICIPALITY_COLUMN_KEYWORD)
    }

    /// Locates all `names`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns the names that could not be found, in the order requested.
    pub fn locate_columns(&self, names: &[&str]) -> Result<Vec<usize>, Vec<String>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match self.column(name) {
                Some(index) => found.push(index),
                None => missing.push((*name).to_string()),
            }
        }

        if missing.is_empty() {
            Ok(found)
        } else {
            Err(missing)
        }
    }

    /// Parses delimited text. The first record is the header row.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Read`] if the reader fails, or
    /// [`TableError::Csv`] if the text is not valid delimited data.
    pub fn from_csv_reader(mut reader: impl Read) -> Result<Self, TableError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::from_csv_str(&text)
    }

    /// Parses delimited text held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Csv`] if the text is not valid delimited data.
    pub fn from_csv_str(text: &str) -> Result<Self, TableError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let delimiter = sniff_delimiter(text);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(ToString::to_string).collect());
        }

        log::debug!(
            "Parsed table with {} column(s) and {} row(s)",
            headers.len(),
            rows.len()
        );

        Ok(Self::new(headers, rows))
    }

    /// Reads a delimited text file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be opened, otherwise
    /// the same errors as [`Table::from_csv_reader`].
    pub fn from_path(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path).map_err(|e| TableError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_csv_reader(file)
    }
}

/// Picks the candidate delimiter that occurs most often in the header line.
/// Ties favour the earlier candidate, so plain comma files stay commas.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    let mut best = CANDIDATE_DELIMITERS[0];
    let mut best_count = 0;

    for candidate in CANDIDATE_DELIMITERS {
        let count = header.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}

/// Errors from reading a [`Table`].
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Malformed delimited text.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The source reader failed.
    #[error("Read error: {0}")]
    Read(#[from] std::io::Error),

    /// The file could not be opened.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
