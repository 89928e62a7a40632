//! In-memory store table.
//!
//! [`StoreTable`] wraps a Polars `DataFrame` whose columns are all text. The
//! directory format mixes identifiers like `34638-85784`, codes and
//! coordinates; reading every column as a string keeps them byte-for-byte
//! so that the cleaned table round-trips to CSV unchanged apart from the
//! transforms applied to it. Empty fields are nulls.

mod row;

pub use row::{Row, Rows};

use crate::error::{AtlasError, Result};
use polars::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Ordered collection of store records sharing one column schema.
#[derive(Debug, Clone)]
pub struct StoreTable {
    frame: DataFrame,
}

impl StoreTable {
    /// Load a delimited-text file with a header row.
    ///
    /// The resulting schema is exactly the header columns of the source.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading store table from {}", path.display());

        let frame = csv_options()
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| AtlasError::load(path, e))?
            .finish()
            .map_err(|e| AtlasError::load(path, e))?;

        Self::checked(frame, path)
    }

    /// Parse delimited text held in memory.
    pub fn from_csv_text(text: &str) -> Result<Self> {
        let frame = csv_options()
            .into_reader_with_file_handle(Cursor::new(text.to_string()))
            .finish()
            .map_err(|e| AtlasError::load("<memory>", e))?;

        Self::checked(frame, Path::new("<memory>"))
    }

    fn checked(frame: DataFrame, source: &Path) -> Result<Self> {
        if frame.width() == 0 {
            return Err(AtlasError::load(source, "no header row"));
        }
        debug!(
            "Loaded {} rows x {} columns from {}",
            frame.height(),
            frame.width(),
            source.display()
        );
        Ok(Self { frame })
    }

    /// Wrap an existing frame.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Borrow the underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning the underlying frame.
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Check that every named column is part of the schema.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }

    /// Per-column null counts, restricted to columns with at least one null.
    ///
    /// Entries are in schema order.
    pub fn column_nulls(&self) -> Vec<(String, usize)> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Rows where `column` is null, in their original order, with all columns.
    pub fn rows_with_null(&self, column: &str) -> Result<StoreTable> {
        let mask = self.column(column)?.as_materialized_series().is_null();
        self.filter_rows(&mask)
    }

    /// Distinct non-null values of `column`, in first-encountered order.
    pub fn unique(&self, column: &str) -> Result<Vec<String>> {
        let values = self.text_column(column)?;
        let mut seen = HashSet::new();
        let mut unique = Vec::new();

        for value in values.into_iter().flatten() {
            if seen.insert(value) {
                unique.push(value.to_string());
            }
        }

        Ok(unique)
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> StoreTable {
        Self::from_frame(self.frame.head(Some(n)))
    }

    /// Snapshot of every column as text, for row-wise access.
    pub fn rows(&self) -> Result<Rows> {
        Rows::new(self)
    }

    pub(crate) fn column(&self, name: &str) -> Result<&Column> {
        self.frame
            .column(name)
            .map_err(|_| AtlasError::ColumnNotFound(name.to_string()))
    }

    /// A column cast to text.
    pub(crate) fn text_column(&self, name: &str) -> Result<StringChunked> {
        let text = self
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        Ok(text.str()?.clone())
    }

    /// Overwrite an existing column with new values.
    pub(crate) fn replace_column(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        self.column(name)?;
        let series = Series::new(name.into(), values);
        self.frame.replace(name, series)?;
        Ok(())
    }

    /// Copy out the rows selected by `mask`.
    pub(crate) fn filter_rows(&self, mask: &BooleanChunked) -> Result<StoreTable> {
        Ok(Self::from_frame(self.frame.filter(mask)?))
    }
}

impl fmt::Display for StoreTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frame)
    }
}

fn csv_options() -> CsvReadOptions {
    // Schema inference off: every column is read as text.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> StoreTable {
        StoreTable::from_frame(
            df!(
                "Store Number" => &["1", "2", "3", "4"],
                "City" => &[Some("Cairo"), None, Some("Seattle"), None],
                "State/Province" => &[Some("C"), Some("GZ"), Some("WA"), None],
                "Country" => &["EG", "EG", "US", "US"],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_column_nulls_skips_complete_columns() {
        let nulls = sample().column_nulls();
        assert_eq!(
            nulls,
            vec![("City".to_string(), 2), ("State/Province".to_string(), 1)]
        );
        assert!(nulls.iter().all(|(_, count)| *count > 0));
    }

    #[test]
    fn test_column_nulls_empty_when_complete() {
        let table = StoreTable::from_frame(df!("Country" => &["US", "CN"]).unwrap());
        assert!(table.column_nulls().is_empty());
    }

    #[test]
    fn test_rows_with_null_keeps_order_and_columns() {
        let table = sample();
        let missing = table.rows_with_null("City").unwrap();

        assert_eq!(missing.height(), 2);
        assert_eq!(missing.column_names(), table.column_names());
        assert_eq!(missing.unique("Store Number").unwrap(), vec!["2", "4"]);
    }

    #[test]
    fn test_rows_with_null_unknown_column() {
        let err = sample().rows_with_null("Postcode").unwrap_err();
        assert!(matches!(err, AtlasError::ColumnNotFound(name) if name == "Postcode"));
    }

    #[test]
    fn test_unique_skips_nulls() {
        let table = sample();
        assert_eq!(table.unique("Country").unwrap(), vec!["EG", "US"]);
        assert_eq!(table.unique("City").unwrap(), vec!["Cairo", "Seattle"]);
    }

    #[test]
    fn test_require_columns() {
        let table = sample();
        assert!(table.require_columns(&["City", "Country"]).is_ok());
        assert!(matches!(
            table.require_columns(&["City", "Brand"]),
            Err(AtlasError::ColumnNotFound(name)) if name == "Brand"
        ));
    }

    #[test]
    fn test_from_csv_text_reads_everything_as_text() {
        let table = StoreTable::from_csv_text(
            "Store Number,City,Longitude\n47370-257954,Seattle,-122.34\n00123,,7.50\n",
        )
        .unwrap();

        assert_eq!(table.height(), 2);
        assert_eq!(
            table.unique("Store Number").unwrap(),
            vec!["47370-257954", "00123"]
        );
        assert_eq!(table.unique("Longitude").unwrap(), vec!["-122.34", "7.50"]);
        assert_eq!(table.column_nulls(), vec![("City".to_string(), 1)]);
    }

    #[test]
    fn test_header_only_source_is_an_empty_table() {
        let table = StoreTable::from_csv_text("Store Number,Country,City\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StoreTable::load("does/not/exist.csv").unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
    }

    #[test]
    fn test_replace_column_requires_existing_column() {
        let mut table = sample();
        let err = table
            .replace_column("Brand", vec![None, None, None, None])
            .unwrap_err();
        assert!(matches!(err, AtlasError::ColumnNotFound(_)));
    }
}
