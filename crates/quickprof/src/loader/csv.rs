use crate::error::{ReportError, Result};
use crate::utils::MISSING_MARKERS;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Rows sampled for schema inference on the first attempt.
const INFER_SCHEMA_ROWS: usize = 100;

/// Read a CSV file with a header row.
///
/// Schema inference first looks at the leading rows only; a column whose
/// later values contradict that guess fails the read, so the file is read
/// again with inference over every row.
pub(super) fn read_csv(path: &Path) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|e| ReportError::load_failure(path, e))?;

    let df = match read_with_inference(path, Some(INFER_SCHEMA_ROWS)) {
        Ok(df) => df,
        Err(e) => {
            debug!("Loading with sampled schema failed: {}", e);
            read_with_inference(path, None).map_err(|e| ReportError::load_failure(path, e))?
        }
    };

    blank_columns_as_float(df).map_err(|e| ReportError::load_failure(path, e))
}

/// Columns without a single present value hold missing numbers, not text.
///
/// A header-only file keeps its text columns.
fn blank_columns_as_float(mut df: DataFrame) -> PolarsResult<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }

    let blank: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| matches!(c.dtype(), DataType::String | DataType::Null))
        .filter(|c| c.null_count() == c.len())
        .map(|c| c.name().clone())
        .collect();

    for name in blank {
        debug!("Column '{}' has no values, reading it as Float64", name);
        let column = df.column(name.as_str())?.cast(&DataType::Float64)?;
        df.with_column(column)?;
    }
    Ok(df)
}

fn read_with_inference(path: &Path, infer_rows: Option<usize>) -> PolarsResult<DataFrame> {
    let null_values = NullValues::AllColumns(
        MISSING_MARKERS
            .iter()
            .filter(|marker| !marker.is_empty())
            .map(|marker| PlSmallStr::from(*marker))
            .collect(),
    );

    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_rows)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(null_values)),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}
