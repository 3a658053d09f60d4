use crate::utils::{DtypeCategory, get_dtype_category};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// How a column participates in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values: statistics, histogram, correlation.
    Numeric,
    /// Text or enumerated labels: count chart.
    Categorical,
    /// Any other dtype (datetime, boolean, nested, ...). Appears only in the
    /// preview, dtype and missing-value tables and the missing-value chart.
    Excluded,
}

impl ColumnKind {
    /// Classify a column from its declared dtype.
    pub fn of(dtype: &DataType) -> Self {
        match get_dtype_category(dtype) {
            DtypeCategory::Numeric => Self::Numeric,
            DtypeCategory::Text => Self::Categorical,
            DtypeCategory::Datetime | DtypeCategory::Boolean | DtypeCategory::Other => {
                Self::Excluded
            }
        }
    }
}

/// Partition of a table's column names, computed once per run.
///
/// `numeric` and `categorical` never overlap; both keep table column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub excluded: Vec<String>,
}

impl ColumnClassification {
    /// Classify every column of `df`.
    pub fn classify(df: &DataFrame) -> Self {
        let mut classification = Self::default();
        for column in df.get_columns() {
            let name = column.name().to_string();
            match ColumnKind::of(column.dtype()) {
                ColumnKind::Numeric => classification.numeric.push(name),
                ColumnKind::Categorical => classification.categorical.push(name),
                ColumnKind::Excluded => classification.excluded.push(name),
            }
        }
        classification
    }

    /// Whether there are enough numeric columns for a correlation matrix.
    pub fn has_correlation(&self) -> bool {
        self.numeric.len() >= 2
    }
}

/// Descriptive statistics of one numeric column.
///
/// Undefined values (no observations, or a single one for `std`) are NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Markup fragments and structured results produced by the profiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileTables {
    /// Preview of the first rows.
    pub head: String,
    /// Summary statistics, one row per numeric column.
    pub describe: String,
    /// Declared dtype of every column.
    pub dtypes: String,
    /// Missing-value count of every column.
    pub missing_values: String,
    /// Missing-value counts in column order.
    pub missing_counts: Vec<(String, usize)>,
    /// Numeric summaries in column order.
    pub summaries: Vec<(String, NumericSummary)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub classification: ColumnClassification,
    pub tables: ProfileTables,
}

/// Kind of generated chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Histogram,
    BarChart,
    Correlation,
    MissingValues,
}

/// A chart persisted to the images directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartArtifact {
    pub kind: ChartKind,
    /// Base name of the image, also the key into the encoded image map.
    pub file_name: String,
    pub path: PathBuf,
}

/// Charts generated for one run plus their inline encodings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizerResult {
    pub histograms: Vec<ChartArtifact>,
    pub bar_charts: Vec<ChartArtifact>,
    pub correlation: Option<ChartArtifact>,
    pub missing: ChartArtifact,
    /// Base64 PNG data keyed by file base name.
    pub encoded_images: BTreeMap<String, String>,
}

impl VisualizerResult {
    /// All artifacts in generation order.
    pub fn artifacts(&self) -> impl Iterator<Item = &ChartArtifact> {
        self.histograms
            .iter()
            .chain(self.bar_charts.iter())
            .chain(self.correlation.iter())
            .chain(std::iter::once(&self.missing))
    }
}
