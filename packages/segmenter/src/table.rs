//! Segmentation over a whole address table.

use civic_link_address_models::{
    AddressLayout, CompactAddress, SegmentationOutcome, SegmentedAddress,
};
use civic_link_config::SegmenterConfig;
use civic_link_table::Table;
use serde::{Deserialize, Serialize};

use crate::{AddressSegmenter, SegmenterError, compose};

/// Default name of the column holding the full address text.
pub const DEFAULT_ADDRESS_COLUMN: &str = "indirizzo_completo";

/// Count of segmented rows per [`SegmentationOutcome`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub fully_segmented: usize,
    pub partially_segmented: usize,
    pub failed: usize,
}

impl OutcomeTally {
    /// Counts one row.
    pub const fn record(&mut self, outcome: SegmentationOutcome) {
        match outcome {
            SegmentationOutcome::FullySegmented => self.fully_segmented += 1,
            SegmentationOutcome::PartiallySegmented => self.partially_segmented += 1,
            SegmentationOutcome::Failed => self.failed += 1,
        }
    }

    /// Total number of rows counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.fully_segmented + self.partially_segmented + self.failed
    }
}

/// Per-row segmentation of an address table, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentedRows {
    pub rows: Vec<SegmentedAddress>,
    pub tally: OutcomeTally,
}

impl SegmentedRows {
    /// Compact view of every row.
    #[must_use]
    pub fn compact(&self, config: &SegmenterConfig) -> Vec<CompactAddress> {
        self.rows
            .iter()
            .map(|address| compose(address, config))
            .collect()
    }

    /// Copy of `source` with the `layout` columns filled from these rows.
    ///
    /// `source` must be the table the rows were segmented from. Existing
    /// layout columns are overwritten.
    #[must_use]
    pub fn to_table(
        &self,
        source: &Table,
        layout: AddressLayout,
        config: &SegmenterConfig,
    ) -> Table {
        let values = self
            .rows
            .iter()
            .map(|address| layout_values(address, layout, config));
        source.with_columns(&layout.columns(), values)
    }
}

/// Cell values of `address` in [`AddressLayout::columns`] order.
fn layout_values(
    address: &SegmentedAddress,
    layout: AddressLayout,
    config: &SegmenterConfig,
) -> Vec<String> {
    match layout {
        AddressLayout::Compact => {
            let compact = compose(address, config);
            vec![
                compact.street,
                compact.house_number,
                compact.specifics,
                compact.outcome.to_string(),
            ]
        }
        AddressLayout::Detailed => vec![
            address.street.clone(),
            address.house_number.clone(),
            address.staircase.clone(),
            address.unit.clone(),
            address.floor.clone(),
            address.extension.clone(),
            address.outcome.to_string(),
        ],
    }
}

/// Segments the `column` value of every row of an address table.
///
/// # Errors
///
/// * [`SegmenterError::MissingColumn`] if the table has no `column`
pub fn segment_table(
    segmenter: &AddressSegmenter,
    table: &Table,
    column: &str,
) -> Result<SegmentedRows, SegmenterError> {
    let address_col = table
        .column(column)
        .ok_or_else(|| SegmenterError::MissingColumn {
            column: column.to_string(),
        })?;

    let mut segmented = SegmentedRows::default();
    for row in table.rows() {
        let address = segmenter.segment(row.get(address_col));
        segmented.tally.record(address.outcome);
        segmented.rows.push(address);
    }

    let tally = &segmented.tally;
    log::info!(
        "Segmented {} address(es): fully_segmented={} partially_segmented={} failed={}",
        tally.total(),
        tally.fully_segmented,
        tally.partially_segmented,
        tally.failed
    );

    Ok(segmented)
}
