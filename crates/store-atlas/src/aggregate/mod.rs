//! Frequency-based summary statistics.
//!
//! Everything here is built on one explicit frequency count: values are
//! tallied into a hash map, then sorted by descending count. Equal counts
//! are ordered lexicographically ascending on the value, so the mode of a
//! column with several equally frequent values is the smallest of them.
//! Nulls are never counted.

use crate::config::ColumnRoles;
use crate::error::{AtlasError, Result};
use crate::table::StoreTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// A value and the number of rows holding it.
pub type Frequency = (String, usize);

/// Headline statistics of a store table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    /// Distinct store identifiers
    pub total_stores: usize,
    /// Distinct countries
    pub total_countries: usize,
    /// Country with the most rows
    pub top_country: String,
    /// City with the most rows
    pub top_city: String,
}

/// Computes frequency statistics over store tables.
pub struct Aggregator;

impl Aggregator {
    /// Full frequency distribution of `column`, most frequent first.
    pub fn frequency_distribution(table: &StoreTable, column: &str) -> Result<Vec<Frequency>> {
        let values = table.text_column(column)?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        let mut distribution: Vec<Frequency> = counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(distribution)
    }

    /// The `n` most frequent values of `column` with their counts.
    ///
    /// Holds `min(n, distinct values)` entries.
    pub fn top_n_by_frequency(
        table: &StoreTable,
        column: &str,
        n: usize,
    ) -> Result<Vec<Frequency>> {
        let mut distribution = Self::frequency_distribution(table, column)?;
        distribution.truncate(n);
        Ok(distribution)
    }

    /// Number of distinct non-null values in `column`.
    pub fn distinct_count(table: &StoreTable, column: &str) -> Result<usize> {
        Ok(table.unique(column)?.len())
    }

    /// Most frequent value of `column`.
    pub fn mode(table: &StoreTable, column: &str) -> Result<String> {
        Self::top_n_by_frequency(table, column, 1)?
            .into_iter()
            .next()
            .map(|(value, _)| value)
            .ok_or_else(|| AtlasError::NoValidValues(column.to_string()))
    }

    /// Store, country and top-location statistics for the whole table.
    pub fn summarize(table: &StoreTable, roles: &ColumnRoles) -> Result<StatisticsRecord> {
        table.require_columns(&[
            roles.store_id.as_str(),
            roles.country.as_str(),
            roles.city.as_str(),
        ])?;
        if table.is_empty() {
            return Err(AtlasError::EmptyTable);
        }

        let stats = StatisticsRecord {
            total_stores: Self::distinct_count(table, &roles.store_id)?,
            total_countries: Self::distinct_count(table, &roles.country)?,
            top_country: Self::mode(table, &roles.country)?,
            top_city: Self::mode(table, &roles.city)?,
        };
        debug!("Summary statistics: {:?}", stats);
        Ok(stats)
    }
}
