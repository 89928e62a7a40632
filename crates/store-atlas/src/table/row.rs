//! Row-wise read access to a [`StoreTable`].

use super::StoreTable;
use crate::error::{AtlasError, Result};
use polars::prelude::*;

/// Text snapshot of every column of a table.
///
/// Taken before a column is rewritten, so each row is read from the values
/// it held when the snapshot was made.
pub struct Rows {
    fields: Vec<(String, StringChunked)>,
    height: usize,
}

impl Rows {
    pub(crate) fn new(table: &StoreTable) -> Result<Self> {
        let fields = table
            .column_names()
            .into_iter()
            .map(|name| -> Result<(String, StringChunked)> {
                let values = table.text_column(&name)?;
                Ok((name, values))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            fields,
            height: table.height(),
        })
    }

    pub fn len(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// The row at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<Row<'_>> {
        (index < self.height).then_some(Row {
            fields: &self.fields,
            index,
        })
    }

    /// All rows, in table order.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.height).map(move |index| Row {
            fields: &self.fields,
            index,
        })
    }
}

/// One record of a table, addressed by column name.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    fields: &'a [(String, StringChunked)],
    index: usize,
}

impl<'a> Row<'a> {
    /// Position of the row in its table.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The value of `column` in this row; `None` when the cell is null.
    pub fn get(&self, column: &str) -> Result<Option<&'a str>> {
        let (_, values) = self
            .fields
            .iter()
            .find(|(name, _)| name == column)
            .ok_or_else(|| AtlasError::ColumnNotFound(column.to_string()))?;
        Ok(values.get(self.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access_by_name() {
        let table = StoreTable::from_frame(
            df!(
                "City" => &[Some("Cairo"), None],
                "State/Province" => &["C", "GZ"],
            )
            .unwrap(),
        );
        let rows = table.rows().unwrap();

        assert_eq!(rows.len(), 2);
        let second = rows.get(1).unwrap();
        assert_eq!(second.index(), 1);
        assert_eq!(second.get("City").unwrap(), None);
        assert_eq!(second.get("State/Province").unwrap(), Some("GZ"));
        assert!(rows.get(2).is_none());
    }

    #[test]
    fn test_row_unknown_column() {
        let table = StoreTable::from_frame(df!("City" => &["Cairo"]).unwrap());
        let rows = table.rows().unwrap();
        let row = rows.get(0).unwrap();
        assert!(matches!(
            row.get("Country"),
            Err(AtlasError::ColumnNotFound(name)) if name == "Country"
        ));
    }

    #[test]
    fn test_numeric_columns_read_as_text() {
        let table = StoreTable::from_frame(df!("Store Number" => &[7i64, 8]).unwrap());
        let rows = table.rows().unwrap();
        let values: Vec<_> = rows
            .iter()
            .map(|row| row.get("Store Number").unwrap().map(str::to_string))
            .collect();
        assert_eq!(values, vec![Some("7".to_string()), Some("8".to_string())]);
    }
}
