use crate::types::{ChartArtifact, DatasetProfile, VisualizerResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Named values handed to the document template.
///
/// The first eleven fields are the slots every template must reference;
/// the trailing ones are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    /// Preview table markup.
    pub head: String,
    /// Statistics table markup.
    pub describe: String,
    /// Dtype table markup.
    pub dtypes: String,
    /// Missing-value table markup.
    pub missing_values: String,
    /// Histogram file names, in numeric column order.
    pub histograms: Vec<String>,
    /// Count chart file names, in categorical column order.
    pub bar_charts: Vec<String>,
    /// Base64 PNG data keyed by file name.
    pub encoded_images: BTreeMap<String, String>,
    pub corr_img: Option<String>,
    pub missing_img: String,

    pub source_file: String,
    pub row_count: usize,
    pub column_count: usize,
    pub excluded_columns: Vec<String>,
    /// Local time the payload was assembled.
    pub generated_at: String,
}

impl ReportPayload {
    /// Combine profiling and chart results of one run.
    pub fn assemble(
        source_file: &Path,
        profile: &DatasetProfile,
        visuals: &VisualizerResult,
    ) -> Self {
        Self {
            numeric_columns: profile.classification.numeric.clone(),
            categorical_columns: profile.classification.categorical.clone(),
            head: profile.tables.head.clone(),
            describe: profile.tables.describe.clone(),
            dtypes: profile.tables.dtypes.clone(),
            missing_values: profile.tables.missing_values.clone(),
            histograms: file_names(&visuals.histograms),
            bar_charts: file_names(&visuals.bar_charts),
            encoded_images: visuals.encoded_images.clone(),
            corr_img: visuals.correlation.as_ref().map(|a| a.file_name.clone()),
            missing_img: visuals.missing.file_name.clone(),
            source_file: source_file.display().to_string(),
            row_count: profile.shape.0,
            column_count: profile.shape.1,
            excluded_columns: profile.classification.excluded.clone(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn file_names(artifacts: &[ChartArtifact]) -> Vec<String> {
    artifacts.iter().map(|a| a.file_name.clone()).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{ChartKind, ColumnClassification, NumericSummary, ProfileTables};
    use std::path::PathBuf;

    fn artifact(kind: ChartKind, name: &str) -> ChartArtifact {
        ChartArtifact {
            kind,
            file_name: name.to_string(),
            path: PathBuf::from("images").join(name),
        }
    }

    pub(crate) fn sample_payload() -> ReportPayload {
        let profile = DatasetProfile {
            shape: (3, 3),
            classification: ColumnClassification {
                numeric: vec!["age".to_string()],
                categorical: vec!["city".to_string()],
                excluded: vec!["joined".to_string()],
            },
            tables: ProfileTables {
                head: "<table>head</table>".to_string(),
                describe: "<table>describe</table>".to_string(),
                dtypes: "<table>dtypes</table>".to_string(),
                missing_values: "<table>missing</table>".to_string(),
                missing_counts: vec![("age".to_string(), 0)],
                summaries: vec![("age".to_string(), NumericSummary::from_values(&[1.0]))],
            },
        };
        let visuals = VisualizerResult {
            histograms: vec![artifact(ChartKind::Histogram, "hist_age.png")],
            bar_charts: vec![artifact(ChartKind::BarChart, "bar_city.png")],
            correlation: None,
            missing: artifact(ChartKind::MissingValues, "missing_values.png"),
            encoded_images: BTreeMap::from([
                ("hist_age.png".to_string(), "AAAA".to_string()),
                ("bar_city.png".to_string(), "BBBB".to_string()),
                ("missing_values.png".to_string(), "CCCC".to_string()),
            ]),
        };
        ReportPayload::assemble(Path::new("people.csv"), &profile, &visuals)
    }

    #[test]
    fn test_assemble() {
        let payload = sample_payload();
        assert_eq!(payload.numeric_columns, vec!["age"]);
        assert_eq!(payload.categorical_columns, vec!["city"]);
        assert_eq!(payload.histograms, vec!["hist_age.png"]);
        assert_eq!(payload.bar_charts, vec!["bar_city.png"]);
        assert_eq!(payload.corr_img, None);
        assert_eq!(payload.missing_img, "missing_values.png");
        assert_eq!(payload.describe, "<table>describe</table>");
        assert_eq!(payload.excluded_columns, vec!["joined"]);
        assert_eq!((payload.row_count, payload.column_count), (3, 3));
        assert_eq!(payload.source_file, "people.csv");
    }

    #[test]
    fn test_every_chart_is_encoded() {
        let payload = sample_payload();
        for name in payload
            .histograms
            .iter()
            .chain(&payload.bar_charts)
            .chain(std::iter::once(&payload.missing_img))
        {
            assert!(payload.encoded_images.contains_key(name), "{name}");
        }
    }
}
