//! The report pipeline and its builder.

use crate::config::{ConfigValidationError, ReportConfig};
use crate::error::Result;
use crate::loader;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::profiler::DataProfiler;
use crate::reporting::{ReportGenerator, ReportPayload};
use crate::types::{ColumnClassification, VisualizerResult};
use crate::visualizer::ChartRenderer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Summary of a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOutcome {
    /// The written document.
    pub report_path: PathBuf,
    /// Every chart image written, in generation order.
    pub images: Vec<PathBuf>,
    pub classification: ColumnClassification,
    pub row_count: usize,
    pub column_count: usize,
    pub duration_ms: u64,
}

/// Load, profile, chart and render one dataset.
///
/// Use [`ReportPipeline::builder()`] to create a pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use quickprof::{ReportConfig, ReportPipeline};
///
/// let outcome = ReportPipeline::builder()
///     .config(ReportConfig::builder().output_path("out/report.html").build()?)
///     .build()?
///     .run("data/sales.csv")?;
/// println!("Report generated: {}", outcome.report_path.display());
/// ```
pub struct ReportPipeline {
    config: ReportConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    profiler: DataProfiler,
    renderer: ChartRenderer,
    generator: ReportGenerator,
}

static_assertions::assert_impl_all!(ReportPipeline: Send);

impl ReportPipeline {
    pub fn builder() -> ReportPipelineBuilder {
        ReportPipelineBuilder::default()
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Run every stage for `input`, stopping at the first failure.
    ///
    /// Images written before a failure are left in place.
    pub fn run(&self, input: impl AsRef<Path>) -> Result<ReportOutcome> {
        match self.run_internal(input.as_ref()) {
            Ok(outcome) => {
                self.report_progress(ProgressUpdate::complete(format!(
                    "Report generated: {}",
                    outcome.report_path.display()
                )));
                Ok(outcome)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Report generation failed [{}]: {}", e.error_code(), e);
                Err(e)
            }
        }
    }

    fn run_internal(&self, input: &Path) -> Result<ReportOutcome> {
        let start = Instant::now();

        self.enter(PipelineStage::Loading);
        let df = loader::load(input)?;

        self.enter(PipelineStage::Profiling);
        let profile = self.profiler.profile(&df)?;
        info!(
            "Numeric columns: {:?}; categorical columns: {:?}",
            profile.classification.numeric, profile.classification.categorical
        );

        self.enter(PipelineStage::Visualizing);
        let charts: VisualizerResult = self.renderer.visualize(&df, &profile.classification)?;

        self.enter(PipelineStage::Assembling);
        let payload = ReportPayload::assemble(input, &profile, &charts);
        let report_path = self.generator.render(&payload)?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("Report pipeline finished in {} ms", duration_ms);

        Ok(ReportOutcome {
            report_path,
            images: charts.artifacts().map(|a| a.path.clone()).collect(),
            classification: profile.classification,
            row_count: profile.shape.0,
            column_count: profile.shape.1,
            duration_ms,
        })
    }

    fn enter(&self, stage: PipelineStage) {
        if let Some(step) = stage.step_label() {
            info!("[{}] {}", step, stage.display_name());
        }
        self.report_progress(ProgressUpdate::started(stage));
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

/// Builder for [`ReportPipeline`].
#[derive(Default)]
pub struct ReportPipelineBuilder {
    config: Option<ReportConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl ReportPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`ReportConfig::default()`].
    pub fn config(mut self, config: ReportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for stage notifications.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<ReportPipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ReportPipeline {
            profiler: DataProfiler::new(config.preview_rows, config.table_classes.clone()),
            renderer: ChartRenderer::new(config.images_dir.clone()),
            generator: ReportGenerator::new(
                config.template_path.clone(),
                config.output_path.clone(),
            ),
            progress_reporter: self.progress_reporter,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> ReportConfig {
        ReportConfig::builder()
            .images_dir(dir.join("images"))
            .template_path(dir.join("report_template.html"))
            .output_path(dir.join("report.html"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_default() {
        let pipeline = ReportPipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().preview_rows, 5);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = ReportConfig {
            preview_rows: 0,
            ..ReportConfig::default()
        };
        assert!(ReportPipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_run_reports_stages_in_order() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("data.csv");
        std::fs::write(&input, "a,b\n1,x\n2,y\n3,x\n").unwrap();

        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);
        let outcome = ReportPipeline::builder()
            .config(config_in(dir.path()))
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .run(&input)
            .unwrap();

        assert_eq!(
            *stages.lock().unwrap(),
            vec![
                PipelineStage::Loading,
                PipelineStage::Profiling,
                PipelineStage::Visualizing,
                PipelineStage::Assembling,
                PipelineStage::Complete,
            ]
        );
        assert_eq!(outcome.report_path, dir.path().join("report.html"));
        assert_eq!(outcome.images.len(), 3);
        assert_eq!((outcome.row_count, outcome.column_count), (3, 2));
    }

    #[test]
    fn test_failure_stops_at_loading() {
        let dir = TempDir::new().unwrap();
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&stages);

        let err = ReportPipeline::builder()
            .config(config_in(dir.path()))
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap()
            .run(dir.path().join("data.json"))
            .unwrap_err();

        assert!(matches!(err, ReportError::UnsupportedFormat { .. }));
        assert_eq!(
            *stages.lock().unwrap(),
            vec![PipelineStage::Loading, PipelineStage::Failed]
        );
        assert!(!dir.path().join("images").exists());
        assert!(!dir.path().join("report.html").exists());
    }
}
