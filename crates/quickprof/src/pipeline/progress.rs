//! Stage progress reporting for the report pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickprof::ReportPipeline;
//!
//! ReportPipeline::builder()
//!     .on_progress(|update| {
//!         eprintln!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run("data.csv")?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of one report run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading the input file
    Loading,
    /// Classifying columns and rendering the summary tables
    Profiling,
    /// Drawing and encoding the charts
    Visualizing,
    /// Filling the template and writing the document
    Assembling,
    /// Report written
    Complete,
    /// Run aborted with an error
    Failed,
}

impl PipelineStage {
    /// The four working stages.
    pub const STEPS: [PipelineStage; 4] = [
        Self::Loading,
        Self::Profiling,
        Self::Visualizing,
        Self::Assembling,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Data",
            Self::Profiling => "Profiling Dataset",
            Self::Visualizing => "Rendering Charts",
            Self::Assembling => "Assembling Report",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// `step/total` label for working stages, e.g. `2/4`.
    pub fn step_label(&self) -> Option<String> {
        Self::STEPS
            .iter()
            .position(|s| s == self)
            .map(|idx| format!("{}/{}", idx + 1, Self::STEPS.len()))
    }

    /// Share of the overall run spent in this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::Profiling => 0.15,
            Self::Visualizing => 0.60,
            Self::Assembling => 0.10,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage: the weights of every
    /// earlier working stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Complete => 1.0,
            Self::Failed => 0.0,
            stage => Self::STEPS
                .iter()
                .take_while(|s| *s != stage)
                .map(PipelineStage::weight)
                .sum(),
        }
    }
}

/// Progress notification emitted at stage boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,
    /// Overall progress (0.0 - 1.0)
    pub progress: f32,
    pub message: String,
}

impl ProgressUpdate {
    /// Update for the start of `stage`.
    pub fn started(stage: PipelineStage) -> Self {
        Self {
            stage,
            progress: stage.base_progress(),
            message: stage.display_name().to_string(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver of [`ProgressUpdate`]s.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
