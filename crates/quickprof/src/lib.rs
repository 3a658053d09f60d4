//! Quick Data Profiling Library
//!
//! Turns a CSV or Excel file into a single self-contained HTML report built
//! with Rust and Polars.
//!
//! # Overview
//!
//! A report run has four stages:
//!
//! - **Loading**: `.csv` through the polars reader, `.xlsx`/`.xls` (first
//!   worksheet) through calamine
//! - **Profiling**: column classification, a data preview, summary statistics,
//!   declared types and missing-value counts as HTML tables
//! - **Visualizing**: histograms, count charts, a correlation heatmap and a
//!   missing-value heatmap as PNG files, base64-encoded for inlining
//! - **Assembling**: a minijinja template filled with the tables and images
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use quickprof::{ReportConfig, ReportPipeline};
//!
//! let outcome = ReportPipeline::builder()
//!     .config(ReportConfig::default())
//!     .build()?
//!     .run("data.csv")?;
//!
//! println!("Report generated: {}", outcome.report_path.display());
//! ```
//!
//! # Configuration
//!
//! ```rust,ignore
//! use quickprof::ReportConfig;
//!
//! let config = ReportConfig::builder()
//!     .images_dir("out/images")           // Chart PNGs
//!     .template_path("my_template.html")  // Falls back to the bundled template
//!     .output_path("out/report.html")
//!     .preview_rows(10)
//!     .build()?;
//! ```
//!
//! # Individual Stages
//!
//! Each stage can be used on its own:
//!
//! ```rust,ignore
//! use quickprof::{ChartRenderer, DataProfiler, ReportGenerator, ReportPayload, loader};
//!
//! let df = loader::load("data.xlsx")?;
//! let profile = DataProfiler::new(5, "table").profile(&df)?;
//! let charts = ChartRenderer::new("images").visualize(&df, &profile.classification)?;
//! let payload = ReportPayload::assemble("data.xlsx".as_ref(), &profile, &charts);
//! ReportGenerator::new("report_template.html", "report.html").render(&payload)?;
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod markup;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod visualizer;

// Re-exports for convenient access
pub use config::{ConfigValidationError, ReportConfig, ReportConfigBuilder};
pub use error::{ReportError, Result as ReportResult, ResultExt};
pub use loader::{InputFormat, load};
pub use pipeline::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate, ReportOutcome,
    ReportPipeline, ReportPipelineBuilder,
};
pub use profiler::DataProfiler;
pub use reporting::{ReportGenerator, ReportPayload};
pub use types::{
    ChartArtifact, ChartKind, ColumnClassification, ColumnKind, DatasetProfile, NumericSummary,
    ProfileTables, VisualizerResult,
};
pub use utils::{DtypeCategory, get_dtype_category, is_numeric_dtype};
pub use visualizer::ChartRenderer;
