//! Dataset loading.
//!
//! [`load`] dispatches on the file extension before touching the file:
//! delimited text goes through the polars CSV reader, workbooks through
//! calamine (first worksheet only).

mod csv;
mod excel;

use crate::error::{ReportError, Result};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::info;

/// Tabular formats accepted by [`load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Comma-delimited text (`.csv`)
    Csv,
    /// Spreadsheet workbook (`.xlsx`, `.xls`)
    Spreadsheet,
}

impl InputFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            _ => Err(ReportError::UnsupportedFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Load a tabular file into memory.
///
/// # Errors
///
/// - [`ReportError::Usage`] for an empty path
/// - [`ReportError::UnsupportedFormat`] for an unknown extension, before any
///   file access
/// - [`ReportError::LoadFailure`] when the file is missing, unreadable or
///   malformed
pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(ReportError::Usage("Input file path must not be empty".to_string()));
    }

    let format = InputFormat::from_path(path)?;
    info!("Loading data from {}...", path.display());

    let df = match format {
        InputFormat::Csv => csv::read_csv(path)?,
        InputFormat::Spreadsheet => excel::read_first_sheet(path)?,
    };

    info!(
        "Data loaded successfully: {} rows x {} columns",
        df.height(),
        df.width()
    );
    Ok(df)
}
