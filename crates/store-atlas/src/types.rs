use crate::aggregate::StatisticsRecord;
use crate::chart::BarChart;
use crate::table::StoreTable;
use std::path::PathBuf;

/// Everything the in-memory part of a run produces.
#[derive(Debug, Clone)]
pub struct ProcessedData {
    /// First rows of the table as loaded.
    pub preview: StoreTable,
    /// Null counts per column before cleaning (columns without nulls omitted).
    pub missing_values: Vec<(String, usize)>,
    /// Rows whose city was null before cleaning.
    pub city_null_rows: StoreTable,
    /// Number of cities filled from the state/province column.
    pub cities_filled: usize,
    /// Rows of the inspected country after the city fill.
    pub inspected: StoreTable,
    /// Distinct brand values before normalization.
    pub brands: Vec<String>,
    /// Number of brand cells rewritten to the canonical label.
    pub brands_normalized: usize,
    /// The cleaned full table.
    pub cleaned: StoreTable,
    /// The cleaned rows of the focus country.
    pub focus: StoreTable,
    /// Statistics over the cleaned full table.
    pub statistics: StatisticsRecord,
    /// Top countries, top cities and top focus-country cities.
    pub charts: Vec<BarChart>,
}

/// Outcome of a full run, including where the tables were written.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub focus_output_file: PathBuf,
    /// Rows read from the input file.
    pub rows_loaded: usize,
    pub duration_ms: u64,
    pub data: ProcessedData,
}
