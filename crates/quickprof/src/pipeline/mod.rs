//! Pipeline module.
//!
//! Runs the loader, profiler, visualizer and report generator in sequence.

mod builder;
pub mod progress;

pub use builder::{ReportOutcome, ReportPipeline, ReportPipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
