//! Dataset profiling.
//!
//! The profiler classifies columns once and renders the four summary tables
//! of the report:
//! - a preview of the leading rows
//! - descriptive statistics of the numeric columns
//! - the declared type of every column
//! - the missing-value count of every column

mod statistics;

pub(crate) use statistics::{mean, sample_std};

use crate::error::{Result, ResultExt};
use crate::markup::{HtmlTable, format_cell, format_stat};
use crate::types::{ColumnClassification, DatasetProfile, NumericSummary, ProfileTables};
use crate::utils::missing_count;
use polars::prelude::*;
use tracing::debug;

/// Column headings of the statistics table.
pub const STAT_HEADERS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Heading of the dtype table.
pub const DTYPE_HEADER: &str = "Data Type";

/// Heading of the missing-value table.
pub const MISSING_HEADER: &str = "Missing Values";

/// Data profiler producing the report tables.
#[derive(Debug, Clone)]
pub struct DataProfiler {
    preview_rows: usize,
    table_classes: String,
}

impl DataProfiler {
    pub fn new(preview_rows: usize, table_classes: impl Into<String>) -> Self {
        Self {
            preview_rows,
            table_classes: table_classes.into(),
        }
    }

    /// Profile a table.
    ///
    /// Succeeds for any loaded table, including one without rows: counts are
    /// then zero and statistics undefined.
    pub fn profile(&self, df: &DataFrame) -> Result<DatasetProfile> {
        let classification = ColumnClassification::classify(df);
        debug!(
            "Classified columns: {} numeric, {} categorical",
            classification.numeric.len(),
            classification.categorical.len()
        );
        for name in &classification.excluded {
            debug!(
                "Column '{}' is neither numeric nor categorical; skipped for statistics and charts",
                name
            );
        }

        let tables = self
            .build_tables(df, &classification)
            .context("profiling dataset")?;

        Ok(DatasetProfile {
            shape: (df.height(), df.width()),
            classification,
            tables,
        })
    }

    fn build_tables(
        &self,
        df: &DataFrame,
        classification: &ColumnClassification,
    ) -> PolarsResult<ProfileTables> {
        let summaries = classification
            .numeric
            .iter()
            .map(|name| {
                let series = df.column(name)?.as_materialized_series();
                Ok((name.clone(), NumericSummary::from_series(series)?))
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        let missing_counts = df
            .get_columns()
            .iter()
            .map(|column| {
                let count = missing_count(column.as_materialized_series())?;
                Ok((column.name().to_string(), count))
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(ProfileTables {
            head: self.preview_table(df)?,
            describe: self.stats_table(&summaries),
            dtypes: self.dtype_table(df),
            missing_values: self.missing_table(&missing_counts),
            missing_counts,
            summaries,
        })
    }

    fn preview_table(&self, df: &DataFrame) -> PolarsResult<String> {
        let head = df.head(Some(self.preview_rows));
        let columns = head
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut table = HtmlTable::new(&self.table_classes, columns);

        for row in 0..head.height() {
            let cells = head
                .get_columns()
                .iter()
                .map(|column| column.get(row).map(|value| format_cell(&value)))
                .collect::<PolarsResult<Vec<_>>>()?;
            table.push_row(row.to_string(), cells);
        }
        Ok(table.to_html())
    }

    fn stats_table(&self, summaries: &[(String, NumericSummary)]) -> String {
        let columns = STAT_HEADERS.iter().map(|h| h.to_string()).collect();
        let mut table = HtmlTable::new(&self.table_classes, columns);
        for (name, summary) in summaries {
            let cells = summary.as_row().iter().map(|v| format_stat(*v)).collect();
            table.push_row(name, cells);
        }
        table.to_html()
    }

    fn dtype_table(&self, df: &DataFrame) -> String {
        let mut table = HtmlTable::new(&self.table_classes, vec![DTYPE_HEADER.to_string()]);
        for column in df.get_columns() {
            table.push_row(column.name().as_str(), vec![column.dtype().to_string()]);
        }
        table.to_html()
    }

    fn missing_table(&self, counts: &[(String, usize)]) -> String {
        let mut table = HtmlTable::new(&self.table_classes, vec![MISSING_HEADER.to_string()]);
        for (name, count) in counts {
            table.push_row(name, vec![count.to_string()]);
        }
        table.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_CLASSES};

    fn profiler() -> DataProfiler {
        DataProfiler::new(DEFAULT_PREVIEW_ROWS, DEFAULT_TABLE_CLASSES)
    }

    fn sample_df() -> DataFrame {
        df!(
            "age" => &[Some(30i64), Some(41), None, Some(25), Some(60), Some(33), Some(47)],
            "city" => &[Some("Oslo"), Some("Lima"), Some("Oslo"), None, Some("Pune"), Some("Lima"), Some("Oslo")],
        )
        .unwrap()
    }

    #[test]
    fn test_profile_classification_and_shape() {
        let profile = profiler().profile(&sample_df()).unwrap();
        assert_eq!(profile.shape, (7, 2));
        assert_eq!(profile.classification.numeric, vec!["age"]);
        assert_eq!(profile.classification.categorical, vec!["city"]);
    }

    #[test]
    fn test_preview_is_limited() {
        let profile = profiler().profile(&sample_df()).unwrap();
        let head = &profile.tables.head;
        assert!(head.contains("<th>4</th>"));
        assert!(!head.contains("<th>5</th>"));
        // Missing cells render as NaN.
        assert!(head.contains("<td>NaN</td>"));
    }

    #[test]
    fn test_preview_of_short_table() {
        let df = df!("x" => &[1i64, 2]).unwrap();
        let profile = profiler().profile(&df).unwrap();
        assert_eq!(profile.tables.head.matches("<tr>").count(), 2);
    }

    #[test]
    fn test_stats_table_has_one_row_per_numeric_column() {
        let profile = profiler().profile(&sample_df()).unwrap();
        let describe = &profile.tables.describe;
        for header in STAT_HEADERS {
            assert!(describe.contains(&format!("<th>{header}</th>")));
        }
        assert!(describe.contains("<th>age</th>"));
        assert!(!describe.contains("<th>city</th>"));
        assert_eq!(profile.tables.summaries.len(), 1);
        assert_eq!(profile.tables.summaries[0].1.count, 6);
    }

    #[test]
    fn test_stats_table_without_numeric_columns() {
        let df = df!("city" => &["Oslo", "Lima"]).unwrap();
        let profile = profiler().profile(&df).unwrap();
        assert!(profile.tables.describe.contains("<th>count</th>"));
        assert_eq!(profile.tables.describe.matches("<tr>").count(), 0);
    }

    #[test]
    fn test_dtype_and_missing_tables() {
        let profile = profiler().profile(&sample_df()).unwrap();
        assert!(profile.tables.dtypes.contains("<th>Data Type</th>"));
        assert!(profile.tables.dtypes.contains("<td>i64</td>"));
        assert!(profile.tables.dtypes.contains("<td>str</td>"));
        assert!(profile.tables.missing_values.contains("<th>Missing Values</th>"));
        assert_eq!(
            profile.tables.missing_counts,
            vec![("age".to_string(), 1), ("city".to_string(), 1)]
        );
    }

    #[test]
    fn test_zero_rows() {
        let df = DataFrame::new(vec![
            Series::new_empty("age".into(), &DataType::Int64).into_column(),
            Series::new_empty("city".into(), &DataType::String).into_column(),
        ])
        .unwrap();

        let profile = profiler().profile(&df).unwrap();
        assert_eq!(profile.shape, (0, 2));
        assert_eq!(
            profile.tables.missing_counts,
            vec![("age".to_string(), 0), ("city".to_string(), 0)]
        );
        let summary = profile.tables.summaries[0].1;
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
        assert!(profile.tables.describe.contains("<td>0.000000</td>"));
        assert!(profile.tables.describe.contains("<td>NaN</td>"));
    }

    #[test]
    fn test_profile_is_deterministic() {
        let first = profiler().profile(&sample_df()).unwrap();
        let second = profiler().profile(&sample_df()).unwrap();
        assert_eq!(first.tables.head, second.tables.head);
        assert_eq!(first.tables.describe, second.tables.describe);
        assert_eq!(first.tables.dtypes, second.tables.dtypes);
        assert_eq!(first.tables.missing_values, second.tables.missing_values);
    }
}
