//! Configuration types for the report pipeline.
//!
//! This module provides configuration options using the builder pattern.
//! The CLI runs with [`ReportConfig::default()`]; library callers can
//! redirect the images directory, template and output document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory for generated chart images.
pub const DEFAULT_IMAGES_DIR: &str = "images";
/// Default document template, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "report_template.html";
/// Default output document.
pub const DEFAULT_OUTPUT_PATH: &str = "report.html";
/// Default number of rows shown in the preview table.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// CSS classes applied to every rendered table.
pub const DEFAULT_TABLE_CLASSES: &str = "table table-striped";

/// Configuration for the report pipeline.
///
/// Use [`ReportConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use quickprof::config::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .images_dir("out/images")
///     .output_path("out/report.html")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving one PNG per chart. Created if absent.
    /// Default: "images"
    pub images_dir: PathBuf,

    /// Document template with named slots for the report payload.
    /// Default: "report_template.html"
    pub template_path: PathBuf,

    /// Rendered report document, overwritten on every run.
    /// Default: "report.html"
    pub output_path: PathBuf,

    /// Number of leading rows shown in the preview table.
    /// Default: 5
    pub preview_rows: usize,

    /// CSS classes for the rendered HTML tables.
    /// Default: "table table-striped"
    pub table_classes: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            preview_rows: DEFAULT_PREVIEW_ROWS,
            table_classes: DEFAULT_TABLE_CLASSES.to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::ZeroPreviewRows);
        }

        for (field, path) in [
            ("images_dir", &self.images_dir),
            ("template_path", &self.template_path),
            ("output_path", &self.output_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyPath(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("preview_rows must be at least 1")]
    ZeroPreviewRows,

    #[error("'{0}' must not be empty")]
    EmptyPath(String),
}

/// Builder for [`ReportConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    images_dir: Option<PathBuf>,
    template_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    preview_rows: Option<usize>,
    table_classes: Option<String>,
}

impl ReportConfigBuilder {
    /// Set the directory that receives chart images.
    pub fn images_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(path.into());
        self
    }

    /// Set the document template path.
    ///
    /// When no file exists at this path the bundled template is used.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Set the output document path.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the number of rows in the preview table.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the CSS classes of rendered tables.
    pub fn table_classes(mut self, classes: impl Into<String>) -> Self {
        self.table_classes = Some(classes.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ReportConfig` or an error if validation fails.
    pub fn build(self) -> Result<ReportConfig, ConfigValidationError> {
        let config = ReportConfig {
            images_dir: self
                .images_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR)),
            template_path: self
                .template_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            output_path: self
                .output_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
            preview_rows: self.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
            table_classes: self
                .table_classes
                .unwrap_or_else(|| DEFAULT_TABLE_CLASSES.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
