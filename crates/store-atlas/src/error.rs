//! Custom error types for the store dataset pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every error is
//! terminal for the call that raised it; nothing is retried.
//!
//! Errors are serializable so that the JSON run report and the CLI can
//! surface them as a `{ code, message }` pair.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the store dataset pipeline.
#[derive(Error, Debug)]
pub enum AtlasError {
    /// The source could not be read or parsed as delimited text with a header row.
    #[error("Failed to load '{path}': {reason}")]
    Load { path: PathBuf, reason: String },

    /// Aggregation was attempted on a table without rows.
    #[error("Cannot aggregate an empty table")]
    EmptyTable,

    /// Column was not found in the table schema.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A column holds no non-null values, so it has no mode.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// A table could not be written out.
    #[error("Failed to save '{path}': {reason}")]
    Persist { path: PathBuf, reason: String },

    /// Configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AtlasError>,
    },
}

impl AtlasError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AtlasError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Build a load error from anything displayable.
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AtlasError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a persistence error from anything displayable.
    pub fn persist(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AtlasError::Persist {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::Persist { .. } => "PERSIST_ERROR",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from a misconfigured run rather than bad data.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::Config(_) => true,
            Self::WithContext { source, .. } => source.is_config_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AtlasError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AtlasError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AtlasError::Polars(e).with_context(context))
    }
}
