//! Report generation module.
//!
//! [`ReportFormatter`] turns a [`StatisticsRecord`](crate::StatisticsRecord)
//! into the one-sentence summary printed at the end of a run.
//! [`RunReport`] is the machine-readable record of a whole run, used for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use store_atlas::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_run_report(&pipeline_result, &config);
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ReportGenerator::write_report_to_file(&report, "output/run_report.json")?;
//! ```

mod formatter;
mod generator;

pub use formatter::ReportFormatter;
pub use generator::{ReportGenerator, RowCounts, RunReport};
