//! CLI entry point for the store directory pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use store_atlas::{
    AtlasConfig, AtlasConfigBuilder, ChartRenderer, Pipeline, PipelineResult, ReportFormatter,
    ReportGenerator, StoreTable, TextChartRenderer,
};
use tracing::{debug, error, info};

/// Config file picked up from the working directory when `-c` is not given.
const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Clean and summarize a store-location directory",
    long_about = "Cleans a store-location CSV directory, writes the cleaned table and a \
                  single-country table, and prints charts and a summary.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG              Overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  # Use ./config.json (or built-in defaults)\n  \
                  store-atlas\n\n  \
                  # Explicit input and outputs\n  \
                  store-atlas -i directory.csv -o out/cleaned.csv --focus-output out/cn.csv\n\n  \
                  # Machine-readable report only\n  \
                  store-atlas -i directory.csv --json | jq .statistics"
)]
struct Args {
    /// Path to a JSON config file
    ///
    /// Defaults to ./config.json when it exists, otherwise built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the store directory CSV
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the cleaned table
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the focus-country table
    #[arg(long)]
    focus_output: Option<PathBuf>,

    /// Country code that gets its own table and city chart
    #[arg(long)]
    focus_country: Option<String>,

    /// Country code whose rows are shown after the city fill
    #[arg(long)]
    inspect_country: Option<String>,

    /// Number of bars per chart
    #[arg(long)]
    top_n: Option<usize>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Output JSON to stdout instead of human-readable output
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write the JSON run report to this path
    #[arg(long, value_name = "PATH")]
    emit_report: Option<PathBuf>,

    /// Save the effective configuration to this path after the run
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = resolve_config(&args)?;

    if !config.input_file.exists() {
        return Err(anyhow!(
            "Input file not found: {}",
            config.input_file.display()
        ));
    }

    let mut builder = Pipeline::builder().config(config.clone());
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }
    let mut pipeline = builder.build()?;

    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(anyhow!("Pipeline failed [{}]: {}", e.error_code(), e));
        }
    };

    handle_pipeline_output(&result, &config, &args)?;

    if let Some(path) = &args.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        info!("Configuration written to: {}", path.display());
    }

    Ok(())
}

/// Load the config file, then apply command-line overrides.
fn resolve_config(args: &Args) -> Result<AtlasConfig> {
    let base = match &args.config {
        Some(path) => AtlasConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            debug!("Using {}", DEFAULT_CONFIG_FILE);
            AtlasConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => AtlasConfig::default(),
    };

    let mut builder = AtlasConfigBuilder::from_config(base);
    if let Some(path) = &args.input {
        builder = builder.input_file(path);
    }
    if let Some(path) = &args.output {
        builder = builder.output_file(path);
    }
    if let Some(path) = &args.focus_output {
        builder = builder.focus_output_file(path);
    }
    if let Some(code) = &args.focus_country {
        builder = builder.focus_country(code);
    }
    if let Some(code) = &args.inspect_country {
        builder = builder.inspect_country(code);
    }
    if let Some(n) = args.top_n {
        builder = builder.top_n(n);
    }
    if args.no_charts {
        builder = builder.render_charts(false);
    }

    Ok(builder.build()?)
}

/// Handle pipeline output based on CLI flags.
///
/// - Default: inspection blocks, charts and the summary sentence on stdout
/// - `--json`: the run report on stdout only (no logs)
/// - `--emit-report`: the run report written to a file as well
fn handle_pipeline_output(
    result: &PipelineResult,
    config: &AtlasConfig,
    args: &Args,
) -> Result<()> {
    let report = ReportGenerator::build_run_report(result, config);

    if let Some(path) = &args.emit_report {
        let report_path = ReportGenerator::write_report_to_file(&report, path)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_inspection(result, config);

    if config.render_charts {
        let mut renderer = TextChartRenderer::stdout(config.chart_width);
        for chart in &result.data.charts {
            renderer.render(chart)?;
            println!();
        }
    }

    println!("{}", ReportFormatter::format(&result.data.statistics));
    Ok(())
}

/// Print the human-readable inspection of a run.
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
/// It should always be visible regardless of log level settings.
fn print_inspection(result: &PipelineResult, config: &AtlasConfig) {
    let data = &result.data;

    section(&format!(
        "FIRST {} ROWS ({} rows loaded)",
        config.preview_rows, result.rows_loaded
    ));
    println!("{}", data.preview);

    section("MISSING VALUES");
    if data.missing_values.is_empty() {
        println!("  No missing values");
    } else {
        for (column, count) in &data.missing_values {
            println!("  {:<20} {}", column, count);
        }
    }
    println!();

    section(&format!(
        "ROWS WITHOUT {} ({})",
        config.columns.city.to_uppercase(),
        data.city_null_rows.height()
    ));
    print_preview(&data.city_null_rows, config.preview_rows);

    section(&format!(
        "{} STORES AFTER FILLING {}",
        config.inspect_country,
        config.columns.city.to_uppercase()
    ));
    print_preview(&data.inspected, config.preview_rows);

    section("BRANDS");
    for brand in &data.brands {
        println!("  - {}", brand);
    }
    println!(
        "  {} values normalized to '{}'",
        data.brands_normalized, config.canonical_brand
    );
    println!();

    section(&format!(
        "{} STORES ({})",
        config.focus_country,
        data.focus.height()
    ));
    print_preview(&data.focus, config.preview_rows);

    section("SAVED");
    println!(
        "  Cleaned data: {} ({} rows)",
        result.output_file.display(),
        data.cleaned.height()
    );
    println!(
        "  {} data:      {} ({} rows)",
        config.focus_country,
        result.focus_output_file.display(),
        data.focus.height()
    );
    println!("  Duration:     {}ms", result.duration_ms);
    println!();
}

fn section(title: &str) {
    println!("{}", title);
    println!("{}", "-".repeat(40));
}

fn print_preview(table: &StoreTable, rows: usize) {
    if table.is_empty() {
        println!("  (none)");
    } else {
        println!("{}", table.head(rows));
    }
    println!();
}
