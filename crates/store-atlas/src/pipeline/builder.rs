//! Main pipeline module.
//!
//! This module provides the `Pipeline` struct and builder that sequence a
//! run: load → inspect → clean → scope → persist → summarize → chart.

use crate::aggregate::Aggregator;
use crate::chart::{BarChart, ChartRenderer};
use crate::config::AtlasConfig;
use crate::error::{Result, ResultExt};
use crate::persist::save_csv;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::table::StoreTable;
use crate::transform::{TransformEngine, fill_missing, uniform_value_map};
use crate::types::{PipelineResult, ProcessedData};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The store dataset pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use store_atlas::{AtlasConfig, Pipeline, TextChartRenderer};
///
/// let config = AtlasConfig::from_file("config.json")?;
/// let result = Pipeline::builder()
///     .chart_renderer(Box::new(TextChartRenderer::stdout(config.chart_width)))
///     .config(config)
///     .build()?
///     .run()?;
///
/// println!("{}", store_atlas::ReportFormatter::format(&result.data.statistics));
/// ```
pub struct Pipeline {
    config: AtlasConfig,
    chart_renderer: Option<Box<dyn ChartRenderer>>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Load the configured input, process it, save both tables and render
    /// the charts.
    pub fn run(&mut self) -> Result<PipelineResult> {
        match self.run_internal() {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Clean, scope and summarize a loaded table without touching the
    /// filesystem.
    pub fn process(&self, table: StoreTable) -> Result<ProcessedData> {
        let prepared = self.prepare(table)?;
        self.summarize(prepared)
    }

    /// Inspection, cleaning and scoping: everything that precedes saving.
    fn prepare(&self, mut table: StoreTable) -> Result<Prepared> {
        let roles = &self.config.columns;
        table.require_columns(&roles.all())?;

        // Inspection of the raw table
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Inspecting,
            "Counting missing values...",
        ));
        let preview = table.head(self.config.preview_rows);
        let missing_values = table.column_nulls();
        for (column, count) in &missing_values {
            debug!("  {}: {} missing", column, count);
        }
        let city_null_rows = table.rows_with_null(&roles.city)?;
        info!(
            "{} columns have missing values; {} rows lack a city",
            missing_values.len(),
            city_null_rows.height()
        );

        // Cleaning, in place
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Cleaning,
            "Filling cities and normalizing brands...",
        ));
        let cities_filled = TransformEngine::apply_row_function(&mut table, &roles.city, |row| {
            fill_missing(row, &roles.city, &roles.state)
        })
        .context("Filling missing cities")?;
        info!("Filled {} cities from {}", cities_filled, roles.state);

        let inspected = TransformEngine::filter_by_equality(
            &table,
            &roles.country,
            &self.config.inspect_country,
        )?;

        let brands = table.unique(&roles.brand)?;
        let brand_map = uniform_value_map(brands.iter().cloned(), &self.config.canonical_brand);
        let brands_normalized = TransformEngine::remap_values(&mut table, &roles.brand, &brand_map)
            .context("Normalizing brands")?;
        info!(
            "Normalized {} brand values ({} distinct) to '{}'",
            brands_normalized,
            brands.len(),
            self.config.canonical_brand
        );

        // Scoping, copy-out
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Scoping,
            format!("Selecting {} stores...", self.config.focus_country),
        ));
        let focus = TransformEngine::filter_by_equality(
            &table,
            &roles.country,
            &self.config.focus_country,
        )?;
        if focus.is_empty() {
            warn!(
                "No stores found for focus country '{}'",
                self.config.focus_country
            );
        }

        Ok(Prepared {
            preview,
            missing_values,
            city_null_rows,
            cities_filled,
            inspected,
            brands,
            brands_normalized,
            cleaned: table,
            focus,
        })
    }

    /// Statistics and chart series over prepared tables.
    fn summarize(&self, prepared: Prepared) -> Result<ProcessedData> {
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Summarizing,
            "Computing statistics...",
        ));
        let statistics = Aggregator::summarize(&prepared.cleaned, &self.config.columns)
            .context("Summarizing stores")?;
        let charts = self.build_charts(&prepared.cleaned, &prepared.focus)?;

        Ok(ProcessedData {
            preview: prepared.preview,
            missing_values: prepared.missing_values,
            city_null_rows: prepared.city_null_rows,
            cities_filled: prepared.cities_filled,
            inspected: prepared.inspected,
            brands: prepared.brands,
            brands_normalized: prepared.brands_normalized,
            cleaned: prepared.cleaned,
            focus: prepared.focus,
            statistics,
            charts,
        })
    }

    fn run_internal(&mut self) -> Result<PipelineResult> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            format!("Loading {}...", self.config.input_file.display()),
        ));
        info!("Loading dataset from: {}", self.config.input_file.display());
        let table = StoreTable::load(&self.config.input_file)?;
        let rows_loaded = table.height();
        info!("Dataset loaded: {} rows x {} columns", rows_loaded, table.width());

        let prepared = self.prepare(table)?;

        // Tables are saved before summarizing, which can fail on empty data.
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Persisting,
            "Saving cleaned tables...",
        ));
        save_csv(&prepared.cleaned, &self.config.output_file)?;
        info!("Cleaned data saved to {}", self.config.output_file.display());
        save_csv(&prepared.focus, &self.config.focus_output_file)?;
        info!(
            "{} data saved to {}",
            self.config.focus_country,
            self.config.focus_output_file.display()
        );

        let data = self.summarize(prepared)?;

        if self.config.render_charts {
            self.render_charts(&data.charts)?;
        }

        Ok(PipelineResult {
            input_file: self.config.input_file.clone(),
            output_file: self.config.output_file.clone(),
            focus_output_file: self.config.focus_output_file.clone(),
            rows_loaded,
            duration_ms: start_time.elapsed().as_millis() as u64,
            data,
        })
    }

    fn render_charts(&mut self, charts: &[BarChart]) -> Result<()> {
        let Some(renderer) = self.chart_renderer.as_mut() else {
            debug!("No chart renderer configured");
            return Ok(());
        };

        if let Some(reporter) = &self.progress_reporter {
            reporter.report(ProgressUpdate::new(
                PipelineStage::Charting,
                "Rendering charts...",
            ));
        }
        for chart in charts {
            renderer.render(chart)?;
        }
        Ok(())
    }

    fn build_charts(&self, table: &StoreTable, focus: &StoreTable) -> Result<Vec<BarChart>> {
        let roles = &self.config.columns;
        let n = self.config.top_n;

        Ok(vec![
            BarChart::top_countries(
                Aggregator::top_n_by_frequency(table, &roles.country, n)?,
                n,
            ),
            BarChart::top_cities(Aggregator::top_n_by_frequency(table, &roles.city, n)?, n),
            BarChart::top_cities_in(
                &self.config.focus_country,
                Aggregator::top_n_by_frequency(focus, &roles.city, n)?,
                n,
            ),
        ])
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Tables and counts produced before anything is saved.
struct Prepared {
    preview: StoreTable,
    missing_values: Vec<(String, usize)>,
    city_null_rows: StoreTable,
    cities_filled: usize,
    inspected: StoreTable,
    brands: Vec<String>,
    brands_normalized: usize,
    cleaned: StoreTable,
    focus: StoreTable,
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AtlasConfig>,
    chart_renderer: Option<Box<dyn ChartRenderer>>,
    progress_reporter: Option<Box<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: AtlasConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the renderer charts are drawn with during [`Pipeline::run`].
    pub fn chart_renderer(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.chart_renderer = Some(renderer);
        self
    }

    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + 'static,
    {
        self.progress_reporter(Box::new(ClosureProgressReporter::new(callback)))
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            chart_renderer: self.chart_renderer,
            progress_reporter: self.progress_reporter,
        })
    }
}
