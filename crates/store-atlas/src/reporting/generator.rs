use crate::aggregate::StatisticsRecord;
use crate::chart::BarChart;
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::reporting::ReportFormatter;
use crate::types::PipelineResult;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Machine-readable record of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub input_file: String,
    pub output_file: String,
    pub focus_output_file: String,
    pub inspect_country: String,
    pub focus_country: String,
    pub duration_ms: u64,

    pub rows: RowCounts,
    /// Null counts per column before cleaning
    pub missing_values: Vec<(String, usize)>,
    /// Brand values found before normalization
    pub brands: Vec<String>,
    pub canonical_brand: String,

    pub statistics: StatisticsRecord,
    pub summary: String,
    pub charts: Vec<BarChart>,
}

/// Row counts at each point of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub loaded: usize,
    pub city_missing: usize,
    pub cities_filled: usize,
    pub brands_normalized: usize,
    pub inspected: usize,
    pub cleaned: usize,
    pub focus: usize,
}

/// Builds and writes [`RunReport`]s.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Collect the report for a finished run.
    pub fn build_run_report(result: &PipelineResult, config: &AtlasConfig) -> RunReport {
        let data = &result.data;

        RunReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: result.input_file.display().to_string(),
            output_file: result.output_file.display().to_string(),
            focus_output_file: result.focus_output_file.display().to_string(),
            inspect_country: config.inspect_country.clone(),
            focus_country: config.focus_country.clone(),
            duration_ms: result.duration_ms,
            rows: RowCounts {
                loaded: result.rows_loaded,
                city_missing: data.city_null_rows.height(),
                cities_filled: data.cities_filled,
                brands_normalized: data.brands_normalized,
                inspected: data.inspected.height(),
                cleaned: data.cleaned.height(),
                focus: data.focus.height(),
            },
            missing_values: data.missing_values.clone(),
            brands: data.brands.clone(),
            canonical_brand: config.canonical_brand.clone(),
            summary: ReportFormatter::format(&data.statistics),
            statistics: data.statistics.clone(),
            charts: data.charts.clone(),
        }
    }

    /// Write `report` as pretty JSON to `path`, creating parent directories.
    pub fn write_report_to_file(report: &RunReport, path: impl AsRef<Path>) -> Result<PathBuf> {
        let report_path = path.as_ref().to_path_buf();
        if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AtlasError::persist(&report_path, e))?;
        }

        let mut file =
            File::create(&report_path).map_err(|e| AtlasError::persist(&report_path, e))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::table::StoreTable;
    use pretty_assertions::assert_eq;

    const STORES: &str = "\
Brand,Store Number,City,State/Province,Country
Starbucks,1,Shanghai,31,CN
Teavana,2,,31,CN
Starbucks,3,Cairo,C,EG
";

    fn result() -> (PipelineResult, AtlasConfig) {
        let config = AtlasConfig::default();
        let pipeline = Pipeline::builder().config(config.clone()).build().unwrap();
        let data = pipeline
            .process(StoreTable::from_csv_text(STORES).unwrap())
            .unwrap();
        let result = PipelineResult {
            input_file: config.input_file.clone(),
            output_file: config.output_file.clone(),
            focus_output_file: config.focus_output_file.clone(),
            rows_loaded: 3,
            duration_ms: 7,
            data,
        };
        (result, config)
    }

    #[test]
    fn test_build_run_report() {
        let (result, config) = result();
        let report = ReportGenerator::build_run_report(&result, &config);

        assert_eq!(
            report.rows,
            RowCounts {
                loaded: 3,
                city_missing: 1,
                cities_filled: 1,
                brands_normalized: 1,
                inspected: 1,
                cleaned: 3,
                focus: 2,
            }
        );
        assert_eq!(report.missing_values, vec![("City".to_string(), 1)]);
        assert_eq!(report.brands, vec!["Starbucks", "Teavana"]);
        assert_eq!(report.statistics.top_country, "CN");
        assert_eq!(report.summary, ReportFormatter::format(&report.statistics));
        assert_eq!(report.charts.len(), 3);
    }

    #[test]
    fn test_write_report_to_file() {
        let (result, config) = result();
        let report = ReportGenerator::build_run_report(&result, &config);
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("out").join("run.json");
        let path = ReportGenerator::write_report_to_file(&report, path).unwrap();

        let written: RunReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.statistics, report.statistics);
        assert_eq!(written.rows, report.rows);
        assert_eq!(written.focus_country, "CN");
    }
}
