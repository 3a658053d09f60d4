//! Error types for the profiling pipeline.
//!
//! Every stage reports failures through [`ReportError`]. None of them are
//! retried: the first error aborts the run and is mapped to a non-zero exit
//! status by the binary.

use crate::config::ConfigValidationError;
use thiserror::Error;

/// The main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Bad or missing command line input.
    #[error("{0}")]
    Usage(String),

    /// The input file extension is not a supported tabular format.
    #[error(
        "Unsupported file format '{extension}' for {path}. Please provide a CSV or Excel file (.csv, .xlsx, .xls)"
    )]
    UnsupportedFormat { path: String, extension: String },

    /// Reading or parsing the input file failed.
    #[error("Error loading data from {path}: {reason}")]
    LoadFailure { path: String, reason: String },

    /// Writing an image or the output document failed.
    #[error("Failed to render report: {0}")]
    RenderFailure(String),

    /// The document template is missing a slot or failed to parse or render.
    #[error("Template error: {0}")]
    TemplateError(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Usage(_) => "USAGE_ERROR",
            Self::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            Self::LoadFailure { .. } => "LOAD_FAILURE",
            Self::RenderFailure(_) => "RENDER_FAILURE",
            Self::TemplateError(_) => "TEMPLATE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Process exit status for this error.
    ///
    /// All failures are terminal and share status 1.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Build a [`ReportError::LoadFailure`] for `path`.
    pub fn load_failure(path: impl AsRef<std::path::Path>, reason: impl ToString) -> Self {
        Self::LoadFailure {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ConfigValidationError> for ReportError {
    fn from(err: ConfigValidationError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl From<minijinja::Error> for ReportError {
    fn from(err: minijinja::Error) -> Self {
        Self::TemplateError(err.to_string())
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

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
        self.map_err(|e| ReportError::Polars(e).with_context(context))
    }
}
