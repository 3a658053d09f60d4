use super::payload::ReportPayload;
use crate::error::{ReportError, Result};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Slots a document template has to reference.
pub const REQUIRED_SLOTS: [&str; 11] = [
    "numeric_columns",
    "categorical_columns",
    "head",
    "describe",
    "dtypes",
    "missing_values",
    "histograms",
    "bar_charts",
    "encoded_images",
    "corr_img",
    "missing_img",
];

/// Template used when no file exists at the configured template path.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/report_template.html");

const TEMPLATE_NAME: &str = "report_template.html";

/// Renders a [`ReportPayload`] through a document template.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    template_path: PathBuf,
    output_path: PathBuf,
}

impl ReportGenerator {
    pub fn new(template_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the report and write it to the output path.
    ///
    /// Returns the path of the written document.
    pub fn render(&self, payload: &ReportPayload) -> Result<PathBuf> {
        let source = self.template_source()?;
        let html = render_template(&source, payload)?;

        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.write_failure(e))?;
        }
        fs::write(&self.output_path, html).map_err(|e| self.write_failure(e))?;

        info!("Report written to {}", self.output_path.display());
        Ok(self.output_path.clone())
    }

    fn template_source(&self) -> Result<Cow<'static, str>> {
        if self.template_path.is_file() {
            debug!("Using template {}", self.template_path.display());
            let source = fs::read_to_string(&self.template_path).map_err(|e| {
                ReportError::TemplateError(format!(
                    "cannot read {}: {}",
                    self.template_path.display(),
                    e
                ))
            })?;
            Ok(Cow::Owned(source))
        } else {
            warn!(
                "Template {} not found, using the bundled template",
                self.template_path.display()
            );
            Ok(Cow::Borrowed(BUNDLED_TEMPLATE))
        }
    }

    fn write_failure(&self, e: std::io::Error) -> ReportError {
        ReportError::RenderFailure(format!(
            "cannot write {}: {}",
            self.output_path.display(),
            e
        ))
    }
}

/// Render `source` with `payload`.
///
/// Fragments in the payload are inserted verbatim; undefined variables are
/// errors, and so is a template that leaves out a required slot.
pub fn render_template(source: &str, payload: &ReportPayload) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let template = env.template_from_named_str(TEMPLATE_NAME, source)?;

    let referenced = template.undeclared_variables(false);
    let missing: Vec<&str> = REQUIRED_SLOTS
        .iter()
        .copied()
        .filter(|slot| !referenced.contains(*slot))
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::TemplateError(format!(
            "template does not reference required slots: {}",
            missing.join(", ")
        )));
    }

    Ok(template.render(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::payload::tests::sample_payload;
    use tempfile::TempDir;

    fn all_slots_template(extra: &str) -> String {
        let mut source = REQUIRED_SLOTS
            .iter()
            .map(|slot| format!("{{{{ {slot} }}}}"))
            .collect::<Vec<_>>()
            .join("\n");
        source.push_str(extra);
        source
    }

    #[test]
    fn test_bundled_template_references_every_slot() {
        let html = render_template(BUNDLED_TEMPLATE, &sample_payload()).unwrap();
        assert!(html.contains("<table>describe</table>"));
        assert!(html.contains("data:image/png;base64,AAAA"));
        assert!(html.contains("data:image/png;base64,BBBB"));
        assert!(html.contains("data:image/png;base64,CCCC"));
        assert!(!html.contains("Correlation Matrix"));
    }

    #[test]
    fn test_bundled_template_escapes_names() {
        let mut payload = sample_payload();
        payload.numeric_columns = vec!["<script>alert(1)</script>".to_string()];
        payload.source_file = "<b>data.csv".to_string();

        let html = render_template(BUNDLED_TEMPLATE, &payload).unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>data.csv"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_fragments_are_not_escaped() {
        let html = render_template(&all_slots_template(""), &sample_payload()).unwrap();
        assert!(html.contains("<table>head</table>"));
        assert!(!html.contains("&lt;table&gt;"));
    }

    #[test]
    fn test_missing_slot_is_template_error() {
        let source = "{{ head }}{{ describe }}";
        let err = render_template(source, &sample_payload()).unwrap_err();
        assert!(matches!(err, ReportError::TemplateError(_)));
        assert!(err.to_string().contains("corr_img"), "{err}");
    }

    #[test]
    fn test_undefined_variable_is_template_error() {
        let source = all_slots_template("{{ not_a_slot }}");
        let err = render_template(&source, &sample_payload()).unwrap_err();
        assert!(matches!(err, ReportError::TemplateError(_)), "{err}");
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let source = all_slots_template("{% for x in %}");
        let err = render_template(&source, &sample_payload()).unwrap_err();
        assert!(matches!(err, ReportError::TemplateError(_)), "{err}");
    }

    #[test]
    fn test_render_writes_output() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("custom.html");
        fs::write(&template, all_slots_template("\ncustom")).unwrap();
        let output = dir.path().join("out").join("report.html");

        let written = ReportGenerator::new(&template, &output)
            .render(&sample_payload())
            .unwrap();

        assert_eq!(written, output);
        let html = fs::read_to_string(&output).unwrap();
        assert!(html.ends_with("custom"));
    }

    #[test]
    fn test_render_falls_back_to_bundled_template() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("report.html");

        ReportGenerator::new(dir.path().join("absent.html"), &output)
            .render(&sample_payload())
            .unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(html.contains("<table>head</table>"));
    }

    #[test]
    fn test_unwritable_output_is_render_failure() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "file").unwrap();

        let err = ReportGenerator::new(dir.path().join("absent.html"), blocker.join("report.html"))
            .render(&sample_payload())
            .unwrap_err();
        assert!(matches!(err, ReportError::RenderFailure(_)), "{err}");
    }
}
