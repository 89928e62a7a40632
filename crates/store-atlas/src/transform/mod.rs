//! Column transforms and row filters over a [`StoreTable`].
//!
//! Cleaning operations ([`TransformEngine::apply_row_function`],
//! [`TransformEngine::remap_values`]) rewrite one column of the table in
//! place. Scoping ([`TransformEngine::filter_by_equality`]) copies the
//! matching rows out and leaves its input untouched.

use crate::error::Result;
use crate::table::{Row, StoreTable};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Mapping from an old categorical value to its replacement.
pub type ValueMap = HashMap<String, String>;

/// Applies cleaning and scoping operations to store tables.
pub struct TransformEngine;

impl TransformEngine {
    /// Overwrite `column` with `f(row)` for every row, in row order.
    ///
    /// `f` sees a snapshot of each row taken before the column is rewritten.
    /// Returns the number of cells whose value changed.
    pub fn apply_row_function<F>(table: &mut StoreTable, column: &str, mut f: F) -> Result<usize>
    where
        F: FnMut(&Row<'_>) -> Result<Option<String>>,
    {
        let rows = table.rows()?;
        let mut values = Vec::with_capacity(rows.len());
        let mut changed = 0;

        for row in rows.iter() {
            let value = f(&row)?;
            if value.as_deref() != row.get(column)? {
                changed += 1;
            }
            values.push(value);
        }

        table.replace_column(column, values)?;
        debug!("Row function rewrote {} cells of '{}'", changed, column);
        Ok(changed)
    }

    /// Replace every value of `column` that is a key of `value_map`.
    ///
    /// Values without an entry, and nulls, are left as they are. Returns the
    /// number of cells replaced.
    pub fn remap_values(
        table: &mut StoreTable,
        column: &str,
        value_map: &ValueMap,
    ) -> Result<usize> {
        let current = table.text_column(column)?;
        let mut replaced = 0;

        let values: Vec<Option<String>> = current
            .into_iter()
            .map(|value| match value {
                Some(old) => match value_map.get(old) {
                    Some(new) => {
                        if new != old {
                            replaced += 1;
                        }
                        Some(new.clone())
                    }
                    None => Some(old.to_string()),
                },
                None => None,
            })
            .collect();

        table.replace_column(column, values)?;
        debug!("Remapped {} values of '{}'", replaced, column);
        Ok(replaced)
    }

    /// Rows whose `column` equals `expected`, as a new table.
    pub fn filter_by_equality(
        table: &StoreTable,
        column: &str,
        expected: &str,
    ) -> Result<StoreTable> {
        let values = table.text_column(column)?;
        let mask: BooleanChunked = values
            .into_iter()
            .map(|value| value == Some(expected))
            .collect();

        let filtered = table.filter_rows(&mask)?;
        debug!(
            "{} of {} rows have {} = '{}'",
            filtered.height(),
            table.height(),
            column,
            expected
        );
        Ok(filtered)
    }
}

/// `row[primary]` when it is non-null, otherwise `row[fallback]`.
///
/// Null when both are null.
pub fn fill_missing(row: &Row<'_>, primary: &str, fallback: &str) -> Result<Option<String>> {
    match row.get(primary)? {
        Some(value) => Ok(Some(value.to_string())),
        None => Ok(row.get(fallback)?.map(str::to_string)),
    }
}

/// A map sending every one of `values` to `canonical`.
pub fn uniform_value_map<I, S>(values: I, canonical: &str) -> ValueMap
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(|value| (value.into(), canonical.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;
    use pretty_assertions::assert_eq;

    fn stores() -> StoreTable {
        StoreTable::from_frame(
            df!(
                "Store Number" => &["1", "2", "3", "4"],
                "City" => &[Some("Cairo"), None, Some("Seattle"), None],
                "State/Province" => &[Some("C"), Some("GZ"), Some("WA"), None],
                "Country" => &["EG", "EG", "US", "US"],
                "Brand" => &["Starbucks", "Teavana", "Starbucks", "Coffee House Holdings"],
            )
            .unwrap(),
        )
    }

    fn column(table: &StoreTable, name: &str) -> Vec<Option<String>> {
        table
            .text_column(name)
            .unwrap()
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_fill_missing_prefers_primary() {
        let table = stores();
        let rows = table.rows().unwrap();
        let first = rows.get(0).unwrap();
        assert_eq!(
            fill_missing(&first, "City", "State/Province").unwrap(),
            Some("Cairo".to_string())
        );
    }

    #[test]
    fn test_fill_missing_falls_back() {
        let table = StoreTable::from_frame(
            df!("City" => &[None::<&str>], "State/Province" => &["WA"]).unwrap(),
        );
        let rows = table.rows().unwrap();
        let row = rows.get(0).unwrap();
        assert_eq!(
            fill_missing(&row, "City", "State/Province").unwrap(),
            Some("WA".to_string())
        );
    }

    #[test]
    fn test_fill_missing_both_null() {
        let table = stores();
        let rows = table.rows().unwrap();
        let last = rows.get(3).unwrap();
        assert_eq!(fill_missing(&last, "City", "State/Province").unwrap(), None);
    }

    #[test]
    fn test_apply_row_function_fills_city() {
        let mut table = stores();
        let changed = TransformEngine::apply_row_function(&mut table, "City", |row| {
            fill_missing(row, "City", "State/Province")
        })
        .unwrap();

        assert_eq!(changed, 1);
        assert_eq!(
            column(&table, "City"),
            vec![
                Some("Cairo".to_string()),
                Some("GZ".to_string()),
                Some("Seattle".to_string()),
                None,
            ]
        );
        assert_eq!(
            table.column_nulls(),
            vec![
                ("City".to_string(), 1),
                ("State/Province".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_apply_row_function_unknown_column() {
        let mut table = stores();
        let err = TransformEngine::apply_row_function(&mut table, "Postcode", |_| Ok(None))
            .unwrap_err();
        assert!(matches!(err, AtlasError::ColumnNotFound(name) if name == "Postcode"));
        assert_eq!(table.width(), 5);
    }

    #[test]
    fn test_apply_row_function_propagates_errors() {
        let mut table = stores();
        let err = TransformEngine::apply_row_function(&mut table, "City", |row| {
            fill_missing(row, "City", "Province")
        })
        .unwrap_err();
        assert!(matches!(err, AtlasError::ColumnNotFound(name) if name == "Province"));
        assert_eq!(table.column_nulls()[0], ("City".to_string(), 2));
    }

    #[test]
    fn test_remap_values_collapses_brands() {
        let mut table = stores();
        let brands = table.unique("Brand").unwrap();
        let map = uniform_value_map(brands, "Starbucks");

        let replaced = TransformEngine::remap_values(&mut table, "Brand", &map).unwrap();

        assert_eq!(replaced, 2);
        assert_eq!(table.unique("Brand").unwrap(), vec!["Starbucks"]);
    }

    #[test]
    fn test_remap_values_passes_unmapped_through() {
        let mut table = stores();
        let map: ValueMap = [("Teavana".to_string(), "Tea".to_string())].into();

        TransformEngine::remap_values(&mut table, "Brand", &map).unwrap();
        let once = column(&table, "Brand");
        assert_eq!(
            once,
            vec![
                Some("Starbucks".to_string()),
                Some("Tea".to_string()),
                Some("Starbucks".to_string()),
                Some("Coffee House Holdings".to_string()),
            ]
        );

        let replaced = TransformEngine::remap_values(&mut table, "Brand", &map).unwrap();
        assert_eq!(replaced, 0);
        assert_eq!(column(&table, "Brand"), once);
    }

    #[test]
    fn test_remap_values_keeps_nulls() {
        let mut table = stores();
        let map: ValueMap = [("Cairo".to_string(), "Al Qahirah".to_string())].into();
        TransformEngine::remap_values(&mut table, "City", &map).unwrap();
        assert_eq!(
            column(&table, "City"),
            vec![
                Some("Al Qahirah".to_string()),
                None,
                Some("Seattle".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn test_filter_by_equality_is_non_destructive() {
        let table = stores();
        let before = column(&table, "Store Number");

        let egypt = TransformEngine::filter_by_equality(&table, "Country", "EG").unwrap();

        assert_eq!(egypt.height(), 2);
        assert_eq!(egypt.unique("Store Number").unwrap(), vec!["1", "2"]);
        assert_eq!(table.height(), 4);
        assert_eq!(column(&table, "Store Number"), before);
    }

    #[test]
    fn test_filter_by_equality_no_match() {
        let table = stores();
        let none = TransformEngine::filter_by_equality(&table, "Country", "CN").unwrap();
        assert!(none.is_empty());
        assert_eq!(none.column_names(), table.column_names());
    }

    #[test]
    fn test_filter_by_equality_skips_nulls() {
        let table = stores();
        let seattle = TransformEngine::filter_by_equality(&table, "City", "Seattle").unwrap();
        assert_eq!(seattle.unique("Store Number").unwrap(), vec!["3"]);
    }
}
