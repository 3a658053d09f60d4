use crate::error::{ReportError, Result};
use crate::utils::MISSING_MARKERS;
use calamine::{Data, DataType as _, Range, Reader, open_workbook_auto};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Read the first worksheet of a workbook; its first row is the header.
pub(super) fn read_first_sheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ReportError::load_failure(path, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReportError::load_failure(path, "workbook contains no worksheets"))?;
    debug!("Reading worksheet '{}'", sheet_name);

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReportError::load_failure(path, e))?;

    range_to_dataframe(&range).map_err(|e| ReportError::load_failure(path, e))
}

/// Convert a cell range into a DataFrame, one typed column per header cell.
fn range_to_dataframe(range: &Range<Data>) -> PolarsResult<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let names = header_names(header);
    let body: Vec<&[Data]> = rows.collect();

    let columns = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            build_column(name, &cells)
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    DataFrame::new(columns)
}

/// Header cells as column names; blank or repeated names get a positional one.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let text = match cell {
                Data::Empty => String::new(),
                other => other.to_string().trim().to_string(),
            };
            let name = if text.is_empty() || seen.contains(&text) {
                format!("Unnamed: {idx}")
            } else {
                text
            };
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => MISSING_MARKERS.contains(&s.trim()),
        Data::Float(f) => f.is_nan(),
        _ => false,
    }
}

/// Value type shared by every present cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Int,
    Float,
    Bool,
    DateTime,
    Text,
}

fn cell_type(cell: &Data) -> CellType {
    match cell {
        Data::Int(_) => CellType::Int,
        Data::Float(_) => CellType::Float,
        Data::Bool(_) => CellType::Bool,
        Data::DateTime(_) => CellType::DateTime,
        _ => CellType::Text,
    }
}

fn column_type(cells: &[&Data]) -> Option<CellType> {
    cells
        .iter()
        .filter(|cell| !is_missing(cell))
        .map(|cell| cell_type(cell))
        .reduce(|acc, next| match (acc, next) {
            (a, b) if a == b => a,
            (CellType::Int, CellType::Float) | (CellType::Float, CellType::Int) => CellType::Float,
            _ => CellType::Text,
        })
}

fn present<'a>(cell: &&'a Data) -> Option<&'a Data> {
    if is_missing(cell) { None } else { Some(*cell) }
}

fn build_column(name: &str, cells: &[&Data]) -> PolarsResult<Column> {
    let name = PlSmallStr::from(name);

    let series = match column_type(cells) {
        Some(CellType::Int) => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| present(cell).and_then(|c| c.as_i64()))
                .collect();
            Series::new(name, values)
        }
        Some(CellType::Float) => {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| present(cell).and_then(|c| c.as_f64()))
                .collect();
            // Workbooks store most numbers as floats; whole-number columns
            // without gaps are integers.
            if values
                .iter()
                .all(|v| v.is_some_and(|x| x.fract() == 0.0 && x.abs() < i64::MAX as f64))
            {
                let ints: Vec<i64> = values.iter().flatten().map(|x| *x as i64).collect();
                Series::new(name, ints)
            } else {
                Series::new(name, values)
            }
        }
        Some(CellType::Bool) => {
            let values: Vec<Option<bool>> = cells
                .iter()
                .map(|cell| match present(cell) {
                    Some(Data::Bool(b)) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        Some(CellType::DateTime) => {
            let millis: Vec<Option<i64>> = cells
                .iter()
                .map(|cell| match present(cell) {
                    Some(Data::DateTime(dt)) => dt
                        .as_datetime()
                        .map(|naive| naive.and_utc().timestamp_millis()),
                    _ => None,
                })
                .collect();
            Series::new(name, millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        // No present cell: missing numbers, unless there are no rows at all.
        None if !cells.is_empty() => Series::full_null(name, cells.len(), &DataType::Float64),
        Some(CellType::Text) | None => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| present(cell).map(|c| c.to_string()))
                .collect();
            Series::new(name, values)
        }
    };

    Ok(series.into_column())
}
