//! Store Directory Pipeline Library
//!
//! Cleans a retail store-location directory, scopes it to single countries
//! and summarizes it, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Table Store**: every column read as text, empty fields as nulls
//! - **Cleaning**: missing cities filled from the state/province column,
//!   brand labels collapsed onto one canonical brand
//! - **Scoping**: copy-out sub-tables for an inspected and a focus country
//! - **Statistics**: distinct stores and countries, most frequent country
//!   and city, top-N frequency series
//! - **Reporting**: a one-sentence summary, text bar charts and a JSON run
//!   report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use store_atlas::{AtlasConfig, Pipeline, ReportFormatter};
//!
//! let config = AtlasConfig::builder()
//!     .input_file("directory.csv")
//!     .focus_country("CN")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//!
//! println!("{}", ReportFormatter::format(&result.data.statistics));
//! ```
//!
//! # Library Use Without Files
//!
//! [`Pipeline::process`] runs the cleaning and summarizing stages on a table
//! that is already in memory and performs no I/O:
//!
//! ```rust,ignore
//! let table = StoreTable::from_csv_text(text)?;
//! let data = Pipeline::builder().build()?.process(table)?;
//! assert!(data.cleaned.column_nulls().is_empty());
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod reporting;
pub mod table;
pub mod transform;
pub mod types;

// Re-exports for convenient access
pub use aggregate::{Aggregator, Frequency, StatisticsRecord};
pub use chart::{BarChart, ChartRenderer, Orientation, TextChartRenderer, render_text};
pub use config::{AtlasConfig, AtlasConfigBuilder, ColumnRoles, ConfigValidationError};
pub use error::{AtlasError, Result as AtlasResult, ResultExt};
pub use persist::save_csv;
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{ReportFormatter, ReportGenerator, RowCounts, RunReport};
pub use table::{Row, Rows, StoreTable};
pub use transform::{TransformEngine, ValueMap, fill_missing, uniform_value_map};
pub use types::{PipelineResult, ProcessedData};
