//! Configuration types for the store dataset pipeline.
//!
//! Configuration is an explicit value handed to [`crate::Pipeline`]; nothing
//! in the crate reads settings ambiently. It can be loaded from a JSON file
//! (missing keys take their defaults) or assembled with the builder.

use crate::error::{AtlasError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Header names for the logical column roles the pipeline depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Unique store identifier. Default: "Store Number"
    pub store_id: String,
    /// Country code. Default: "Country"
    pub country: String,
    /// City name. Default: "City"
    pub city: String,
    /// State or province, used to fill missing cities. Default: "State/Province"
    pub state: String,
    /// Brand label. Default: "Brand"
    pub brand: String,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            store_id: "Store Number".to_string(),
            country: "Country".to_string(),
            city: "City".to_string(),
            state: "State/Province".to_string(),
            brand: "Brand".to_string(),
        }
    }
}

impl ColumnRoles {
    /// All role columns, in a stable order.
    pub fn all(&self) -> [&str; 5] {
        [
            self.store_id.as_str(),
            self.country.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.brand.as_str(),
        ]
    }
}

/// Configuration for a pipeline run.
///
/// Use [`AtlasConfig::builder()`] to create a configuration with the fluent
/// API, or [`AtlasConfig::from_file`] to read one from JSON.
///
/// # Example
///
/// ```rust,ignore
/// use store_atlas::AtlasConfig;
///
/// let config = AtlasConfig::builder()
///     .input_file("directory.csv")
///     .focus_country("CN")
///     .top_n(10)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Raw store directory to load.
    /// Default: "directory.csv"
    pub input_file: PathBuf,

    /// Where the cleaned full table is written.
    /// Default: "directory_cleaned.csv"
    pub output_file: PathBuf,

    /// Where the focus-country sub-table is written.
    /// Default: "directory_focus.csv"
    #[serde(alias = "cn_output_file")]
    pub focus_output_file: PathBuf,

    /// Header names for the column roles.
    pub columns: ColumnRoles,

    /// Country whose rows are shown after the city fill.
    /// Default: "EG"
    pub inspect_country: String,

    /// Country that gets its own output file and city chart.
    /// Default: "CN"
    pub focus_country: String,

    /// Label every brand value is collapsed onto.
    /// Default: "Starbucks"
    pub canonical_brand: String,

    /// Number of bars per chart.
    /// Default: 10
    pub top_n: usize,

    /// Whether charts are rendered during a run.
    /// Default: true
    pub render_charts: bool,

    /// Width in characters of the longest bar.
    /// Default: 50
    pub chart_width: usize,

    /// Number of rows shown in table previews.
    /// Default: 5
    pub preview_rows: usize,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("directory.csv"),
            output_file: PathBuf::from("directory_cleaned.csv"),
            focus_output_file: PathBuf::from("directory_focus.csv"),
            columns: ColumnRoles::default(),
            inspect_country: "EG".to_string(),
            focus_country: "CN".to_string(),
            canonical_brand: "Starbucks".to_string(),
            top_n: 10,
            render_charts: true,
            chart_width: 50,
            preview_rows: 5,
        }
    }
}

impl AtlasConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(AtlasError::from)
            .context(format!("Reading config '{}'", path.display()))?;
        let config: AtlasConfig = serde_json::from_str(&raw)
            .map_err(AtlasError::from)
            .context(format!("Parsing config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(AtlasError::from)
            .context(format!("Writing config '{}'", path.display()))
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        for (field, path) in [
            ("input_file", &self.input_file),
            ("output_file", &self.output_file),
            ("focus_output_file", &self.focus_output_file),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyField(field.to_string()));
            }
        }

        for (field, value) in [
            ("inspect_country", &self.inspect_country),
            ("focus_country", &self.focus_country),
            ("canonical_brand", &self.canonical_brand),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyField(field.to_string()));
            }
        }

        if self.columns.all().iter().any(|name| name.is_empty()) {
            return Err(ConfigValidationError::EmptyField("columns".to_string()));
        }

        for (field, value) in [
            ("top_n", self.top_n),
            ("chart_width", self.chart_width),
            ("preview_rows", self.preview_rows),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::ZeroCount(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{0}': must not be empty")]
    EmptyField(String),

    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroCount(String),
}

/// Builder for [`AtlasConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AtlasConfigBuilder {
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    focus_output_file: Option<PathBuf>,
    columns: Option<ColumnRoles>,
    inspect_country: Option<String>,
    focus_country: Option<String>,
    canonical_brand: Option<String>,
    top_n: Option<usize>,
    render_charts: Option<bool>,
    chart_width: Option<usize>,
    preview_rows: Option<usize>,
}

impl AtlasConfigBuilder {
    /// Start from an existing configuration, e.g. one read from disk.
    pub fn from_config(config: AtlasConfig) -> Self {
        Self {
            input_file: Some(config.input_file),
            output_file: Some(config.output_file),
            focus_output_file: Some(config.focus_output_file),
            columns: Some(config.columns),
            inspect_country: Some(config.inspect_country),
            focus_country: Some(config.focus_country),
            canonical_brand: Some(config.canonical_brand),
            top_n: Some(config.top_n),
            render_charts: Some(config.render_charts),
            chart_width: Some(config.chart_width),
            preview_rows: Some(config.preview_rows),
        }
    }

    /// Set the raw input file.
    pub fn input_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_file = Some(path.into());
        self
    }

    /// Set the cleaned output file.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Set the focus-country output file.
    pub fn focus_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.focus_output_file = Some(path.into());
        self
    }

    /// Set the header names for the column roles.
    pub fn columns(mut self, columns: ColumnRoles) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the country shown after the city fill.
    pub fn inspect_country(mut self, code: impl Into<String>) -> Self {
        self.inspect_country = Some(code.into());
        self
    }

    /// Set the country that gets its own output and chart.
    pub fn focus_country(mut self, code: impl Into<String>) -> Self {
        self.focus_country = Some(code.into());
        self
    }

    /// Set the label all brands are normalized to.
    pub fn canonical_brand(mut self, brand: impl Into<String>) -> Self {
        self.canonical_brand = Some(brand.into());
        self
    }

    /// Set the number of bars per chart.
    pub fn top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    /// Enable or disable chart rendering.
    pub fn render_charts(mut self, render: bool) -> Self {
        self.render_charts = Some(render);
        self
    }

    /// Set the width of the longest bar, in characters.
    pub fn chart_width(mut self, width: usize) -> Self {
        self.chart_width = Some(width);
        self
    }

    /// Set the number of rows shown in previews.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AtlasConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<AtlasConfig, ConfigValidationError> {
        let defaults = AtlasConfig::default();
        let config = AtlasConfig {
            input_file: self.input_file.unwrap_or(defaults.input_file),
            output_file: self.output_file.unwrap_or(defaults.output_file),
            focus_output_file: self.focus_output_file.unwrap_or(defaults.focus_output_file),
            columns: self.columns.unwrap_or(defaults.columns),
            inspect_country: self.inspect_country.unwrap_or(defaults.inspect_country),
            focus_country: self.focus_country.unwrap_or(defaults.focus_country),
            canonical_brand: self.canonical_brand.unwrap_or(defaults.canonical_brand),
            top_n: self.top_n.unwrap_or(defaults.top_n),
            render_charts: self.render_charts.unwrap_or(defaults.render_charts),
            chart_width: self.chart_width.unwrap_or(defaults.chart_width),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        };

        config.validate()?;
        Ok(config)
    }
}
