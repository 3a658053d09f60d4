//! HTML table fragments embedded in the report.
//!
//! Tables follow the familiar dataframe layout: a header row, an index
//! column rendered as `<th>` and right-aligned headings.

use minijinja::HtmlEscape;
use polars::prelude::*;
use std::fmt::Write;

/// Text shown for a missing cell.
pub const MISSING_CELL: &str = "NaN";

/// An HTML table with a leading index column.
#[derive(Debug, Clone)]
pub struct HtmlTable {
    classes: String,
    columns: Vec<String>,
    rows: Vec<(String, Vec<String>)>,
}

impl HtmlTable {
    pub fn new(classes: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            classes: classes.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. `cells` should have one entry per column.
    pub fn push_row(&mut self, index: impl Into<String>, cells: Vec<String>) {
        self.rows.push((index.into(), cells));
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let class_attr = if self.classes.is_empty() {
            "dataframe".to_string()
        } else {
            format!("dataframe {}", self.classes)
        };

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "<table border=\"1\" class=\"{}\">",
            HtmlEscape(&class_attr)
        );
        out.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n");
        for column in &self.columns {
            let _ = writeln!(out, "      <th>{}</th>", HtmlEscape(column));
        }
        out.push_str("    </tr>\n  </thead>\n  <tbody>\n");
        for (index, cells) in &self.rows {
            out.push_str("    <tr>\n");
            let _ = writeln!(out, "      <th>{}</th>", HtmlEscape(index));
            for cell in cells {
                let _ = writeln!(out, "      <td>{}</td>", HtmlEscape(cell));
            }
            out.push_str("    </tr>\n");
        }
        out.push_str("  </tbody>\n</table>");
        out
    }
}

/// Render one cell value as display text.
pub fn format_cell(value: &AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => MISSING_CELL.to_string(),
        AnyValue::Float64(v) => format_float(*v),
        AnyValue::Float32(v) => format_float(f64::from(*v)),
        other => match other.get_str() {
            Some(s) => s.to_string(),
            None => other.to_string(),
        },
    }
}

/// Shortest round-trip representation, `NaN` for undefined values.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        MISSING_CELL.to_string()
    } else {
        format!("{value}")
    }
}

/// Fixed six-decimal representation used by the statistics table.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        MISSING_CELL.to_string()
    } else {
        format!("{value:.6}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_layout() {
        let mut table = HtmlTable::new("table", vec!["Missing Values".to_string()]);
        table.push_row("age", vec!["0".to_string()]);

        let expected = "<table border=\"1\" class=\"dataframe table\">\n  <thead>\n    <tr style=\"text-align: right;\">\n      <th></th>\n      <th>Missing Values</th>\n    </tr>\n  </thead>\n  <tbody>\n    <tr>\n      <th>age</th>\n      <td>0</td>\n    </tr>\n  </tbody>\n</table>";
        assert_eq!(table.to_html(), expected);
    }

    #[test]
    fn test_cells_are_escaped() {
        let mut table = HtmlTable::new("", vec!["<b>".to_string()]);
        table.push_row("0", vec!["a & b".to_string()]);
        let html = table.to_html();
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("a &amp; b"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(&AnyValue::Null), "NaN");
        assert_eq!(format_cell(&AnyValue::Int64(42)), "42");
        assert_eq!(format_cell(&AnyValue::Float64(2.5)), "2.5");
        assert_eq!(format_cell(&AnyValue::String("Oslo")), "Oslo");
        assert_eq!(format_cell(&AnyValue::Boolean(true)), "true");
    }

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(1.5), "1.500000");
        assert_eq!(format_stat(f64::NAN), "NaN");
    }
}
