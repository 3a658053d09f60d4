//! Chart generation.
//!
//! [`ChartRenderer`] writes one PNG per chart into the images directory, in a
//! fixed order:
//! 1. `hist_<column>.png` for every numeric column
//! 2. `bar_<column>.png` for every categorical column
//! 3. `correlation_matrix.png` when there are at least two numeric columns
//! 4. `missing_values.png`
//!
//! Once every image is on disk they are read back and base64-encoded for
//! inline embedding.

mod canvas;
mod charts;
mod correlation;
mod encoding;
mod histogram;

use crate::error::{ReportError, Result};
use crate::types::{ChartArtifact, ChartKind, ColumnClassification, VisualizerResult};
use crate::utils::{
    category_counts, missing_mask, numeric_values, optional_numeric_values,
    sanitize_file_component,
};
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the correlation heatmap.
pub const CORRELATION_FILE: &str = "correlation_matrix.png";
/// File name of the missing-value heatmap.
pub const MISSING_FILE: &str = "missing_values.png";

/// Renders the report charts into an images directory.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    images_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Draw every chart for `df` and encode the results.
    ///
    /// Charts are drawn one after another; the first failure aborts the run
    /// and leaves already written images in place.
    pub fn visualize(
        &self,
        df: &DataFrame,
        classification: &ColumnClassification,
    ) -> Result<VisualizerResult> {
        std::fs::create_dir_all(&self.images_dir).map_err(|e| {
            ReportError::RenderFailure(format!(
                "cannot create images directory {}: {}",
                self.images_dir.display(),
                e
            ))
        })?;

        let mut names = FileNames::default();

        let mut histograms = Vec::with_capacity(classification.numeric.len());
        for column in &classification.numeric {
            let values = numeric_values(df.column(column)?.as_materialized_series())?;
            let artifact = self.artifact(ChartKind::Histogram, names.claim("hist", column));
            debug!("Drawing histogram of '{}' ({} values)", column, values.len());
            self.render(&artifact, |path| charts::draw_histogram(path, column, &values))?;
            histograms.push(artifact);
        }

        let mut bar_charts = Vec::with_capacity(classification.categorical.len());
        for column in &classification.categorical {
            let counts = category_counts(df.column(column)?.as_materialized_series())?;
            let artifact = self.artifact(ChartKind::BarChart, names.claim("bar", column));
            debug!("Drawing count chart of '{}' ({} categories)", column, counts.len());
            self.render(&artifact, |path| charts::draw_bar_chart(path, column, &counts))?;
            bar_charts.push(artifact);
        }

        let correlation = if classification.has_correlation() {
            let columns = classification
                .numeric
                .iter()
                .map(|name| optional_numeric_values(df.column(name)?.as_materialized_series()))
                .collect::<PolarsResult<Vec<_>>>()?;
            let matrix = correlation::correlation_matrix(&columns);
            let artifact = self.artifact(ChartKind::Correlation, CORRELATION_FILE.to_string());
            self.render(&artifact, |path| {
                charts::draw_correlation(path, &classification.numeric, &matrix)
            })?;
            Some(artifact)
        } else {
            debug!(
                "Skipping correlation matrix: {} numeric column(s)",
                classification.numeric.len()
            );
            None
        };

        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let masks = df
            .get_columns()
            .iter()
            .map(|column| missing_mask(column.as_materialized_series()))
            .collect::<PolarsResult<Vec<_>>>()?;
        let missing = self.artifact(ChartKind::MissingValues, MISSING_FILE.to_string());
        self.render(&missing, |path| {
            charts::draw_missing(path, &column_names, &masks, df.height())
        })?;

        let mut result = VisualizerResult {
            histograms,
            bar_charts,
            correlation,
            missing,
            encoded_images: BTreeMap::new(),
        };
        result.encoded_images = encode_all(&result)?;

        info!(
            "Generated {} charts in {}",
            result.encoded_images.len(),
            self.images_dir.display()
        );
        Ok(result)
    }

    fn artifact(&self, kind: ChartKind, file_name: String) -> ChartArtifact {
        ChartArtifact {
            kind,
            path: self.images_dir.join(&file_name),
            file_name,
        }
    }

    fn render<F>(&self, artifact: &ChartArtifact, draw: F) -> Result<()>
    where
        F: FnOnce(&Path) -> anyhow::Result<()>,
    {
        draw(&artifact.path).map_err(|e| {
            ReportError::RenderFailure(format!("{}: {:#}", artifact.path.display(), e))
        })?;
        info!("Saved {}", artifact.path.display());
        Ok(())
    }
}

/// Base64 encoding of every artifact keyed by file name.
fn encode_all(result: &VisualizerResult) -> Result<BTreeMap<String, String>> {
    result
        .artifacts()
        .map(|artifact| {
            let encoded = encoding::encode_file(&artifact.path).map_err(|e| {
                ReportError::RenderFailure(format!(
                    "cannot read back {}: {}",
                    artifact.path.display(),
                    e
                ))
            })?;
            Ok((artifact.file_name.clone(), encoded))
        })
        .collect()
}

/// Per-run registry keeping chart file names unique after sanitizing.
#[derive(Debug, Default)]
struct FileNames {
    taken: HashSet<String>,
}

impl FileNames {
    /// `<prefix>_<column>.png`, suffixed with a counter when two columns
    /// sanitize to the same name.
    fn claim(&mut self, prefix: &str, column: &str) -> String {
        let stem = format!("{prefix}_{}", sanitize_file_component(column));
        let mut candidate = format!("{stem}.png");
        let mut n = 2;
        while !self.taken.insert(candidate.clone()) {
            candidate = format!("{stem}_{n}.png");
            n += 1;
        }
        candidate
    }
}
