//! Report assembly and rendering.
//!
//! [`ReportPayload::assemble`] gathers the profiler's tables and the
//! visualizer's charts into one set of named template slots;
//! [`ReportGenerator`] renders them through a document template and writes
//! the result.
//!
//! # Example
//!
//! ```rust,ignore
//! use quickprof::reporting::{ReportGenerator, ReportPayload};
//!
//! let payload = ReportPayload::assemble(path, &profile, &charts);
//! let written = ReportGenerator::new("report_template.html", "report.html")
//!     .render(&payload)?;
//! ```

mod generator;
mod payload;

pub use generator::{BUNDLED_TEMPLATE, REQUIRED_SLOTS, ReportGenerator, render_template};
pub use payload::ReportPayload;
