//! Progress reporting for the store pipeline.
//!
//! The pipeline runs synchronously from start to finish; progress updates
//! only tell an observer (the CLI log, a test) which stage it is in.
//!
//! # Example
//!
//! ```rust,ignore
//! use store_atlas::{AtlasConfig, Pipeline};
//!
//! let result = Pipeline::builder()
//!     .config(AtlasConfig::default())
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the source table
    Loading,
    /// Counting nulls and collecting rows with a missing city
    Inspecting,
    /// Filling cities and normalizing brands
    Cleaning,
    /// Narrowing the table to single countries
    Scoping,
    /// Writing the cleaned tables
    Persisting,
    /// Computing summary statistics and chart series
    Summarizing,
    /// Drawing charts
    Charting,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Inspecting => "Inspecting Data",
            Self::Cleaning => "Cleaning Data",
            Self::Scoping => "Scoping Countries",
            Self::Persisting => "Saving Tables",
            Self::Summarizing => "Summarizing",
            Self::Charting => "Rendering Charts",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Returns the cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::Inspecting => 0.25,
            Self::Cleaning => 0.35,
            Self::Scoping => 0.55,
            Self::Persisting => 0.60,
            Self::Summarizing => 0.75,
            Self::Charting => 0.90,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

/// A progress notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Current pipeline stage
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0) at the start of the stage
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Creates a progress update for the start of a stage.
    pub fn new(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            progress: stage.base_progress(),
            message: message.into(),
        }
    }

    /// Creates a completion progress update.
    pub fn complete(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Complete, message)
    }

    /// Creates a failed progress update.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(PipelineStage::Failed, message)
    }
}

/// Receives progress updates from the pipeline.
pub trait ProgressReporter {
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate),
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate),
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate),
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_stage_progress_is_monotonic() {
        let order = [
            PipelineStage::Loading,
            PipelineStage::Inspecting,
            PipelineStage::Cleaning,
            PipelineStage::Scoping,
            PipelineStage::Persisting,
            PipelineStage::Summarizing,
            PipelineStage::Charting,
            PipelineStage::Complete,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].base_progress() < pair[1].base_progress());
        }
    }

    #[test]
    fn test_update_constructors() {
        let update = ProgressUpdate::new(PipelineStage::Cleaning, "Filling cities");
        assert_eq!(update.progress, 0.35);
        assert_eq!(ProgressUpdate::complete("done").progress, 1.0);
        assert_eq!(ProgressUpdate::failed("boom").stage, PipelineStage::Failed);
    }

    #[test]
    fn test_closure_reporter() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let reporter = ClosureProgressReporter::new(move |update: ProgressUpdate| {
            sink.borrow_mut().push(update.stage);
        });

        reporter.report(ProgressUpdate::new(PipelineStage::Loading, "Loading"));
        reporter.report(ProgressUpdate::complete("done"));

        assert_eq!(
            *seen.borrow(),
            vec![PipelineStage::Loading, PipelineStage::Complete]
        );
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&PipelineStage::Persisting).unwrap();
        assert_eq!(json, "\"persisting\"");
    }
}
