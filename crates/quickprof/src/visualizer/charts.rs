//! The four chart kinds.
//!
//! Each function draws exactly one PNG inside its own canvas. Category axes
//! use unit-height slots in float coordinates; their labels are placed on the
//! root area next to the plotting area.

use super::canvas::{
    BAR_COLOR, FONT_FAMILY, LABEL_SIZE, LINE_COLOR, MISSING_COLOR, PRESENT_COLOR, TITLE_SIZE,
    UNDEFINED_COLOR, label_area_width, label_stride, label_style, truncate_label, with_canvas,
};
use super::correlation::coolwarm;
use super::histogram::{Histogram, kde_curve};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

pub(super) const HISTOGRAM_SIZE: (u32, u32) = (600, 400);
pub(super) const BAR_CHART_SIZE: (u32, u32) = (800, 600);
pub(super) const CORRELATION_SIZE: (u32, u32) = (1000, 800);
pub(super) const MISSING_SIZE: (u32, u32) = (1200, 600);

const MAX_LABEL_CHARS: usize = 24;
const COLORBAR_WIDTH: i32 = 110;
const COLORBAR_STEPS: usize = 100;

/// Histogram of present values with a density curve on top.
pub(super) fn draw_histogram(path: &Path, column: &str, values: &[f64]) -> Result<()> {
    let hist = Histogram::from_values(values);
    anyhow::ensure!(
        hist.start.is_finite() && hist.end().is_finite() && hist.end() > hist.start,
        "no drawable range for the histogram of '{column}'"
    );
    let curve = kde_curve(values, &hist);
    let curve_max = curve.iter().map(|(_, y)| *y).fold(0.0, f64::max);
    let y_max = (hist.max_count() as f64).max(curve_max).max(1.0) * 1.05;

    with_canvas(path, HISTOGRAM_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(format!("Distribution of {column}"), (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(hist.start..hist.end(), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(column)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(hist.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], BAR_COLOR.mix(0.75).filled())
        }))?;
        chart.draw_series(hist.bins().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], WHITE.stroke_width(1))
        }))?;
        if !curve.is_empty() {
            chart.draw_series(LineSeries::new(
                curve.iter().copied(),
                LINE_COLOR.stroke_width(2),
            ))?;
        }
        Ok(())
    })
}

/// Horizontal bars of category frequencies, most frequent at the top.
///
/// `counts` must already be ordered by descending frequency.
pub(super) fn draw_bar_chart(path: &Path, column: &str, counts: &[(String, usize)]) -> Result<()> {
    let labels: Vec<String> = counts
        .iter()
        .map(|(value, _)| truncate_label(value, MAX_LABEL_CHARS))
        .collect();
    let slots = counts.len().max(1);
    let x_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64 * 1.1;
    let slot_of = |rank: usize| (slots - 1 - rank) as f64;

    with_canvas(path, BAR_CHART_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(format!("Count of {column}"), (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(label_area_width(&labels))
            .build_cartesian_2d(0f64..x_max, 0f64..slots as f64)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .x_desc("count")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(rank, (_, count))| {
            let slot = slot_of(rank);
            Rectangle::new(
                [(0.0, slot + 0.1), (*count as f64, slot + 0.9)],
                BAR_COLOR.filled(),
            )
        }))?;

        let (_, top) = chart.backend_coord(&(0.0, slots as f64));
        let (_, bottom) = chart.backend_coord(&(0.0, 0.0));
        let stride = label_stride(bottom - top, slots, LABEL_SIZE as i32 + 2);
        let style = label_style(HPos::Right, VPos::Center);
        for (rank, label) in labels.iter().enumerate().step_by(stride) {
            let (x, y) = chart.backend_coord(&(0.0, slot_of(rank) + 0.5));
            root.draw(&Text::new(label.as_str(), (x - 6, y), style.clone()))?;
        }
        Ok(())
    })
}

/// Annotated correlation heatmap with a colour bar.
pub(super) fn draw_correlation(path: &Path, names: &[String], matrix: &[Vec<f64>]) -> Result<()> {
    let k = names.len();
    let labels: Vec<String> = names
        .iter()
        .map(|name| truncate_label(name, MAX_LABEL_CHARS))
        .collect();
    let cells: Vec<(usize, usize, f64)> = (0..k)
        .flat_map(|i| (0..k).map(move |j| (i, j)))
        .map(|(i, j)| (i, j, matrix[i][j]))
        .collect();
    // Row 0 is drawn at the top.
    let top_of = |row: usize| (k - row) as f64;

    with_canvas(path, CORRELATION_SIZE, |root| {
        let (main, legend) = root.split_horizontally(CORRELATION_SIZE.0 as i32 - COLORBAR_WIDTH);

        let mut chart = ChartBuilder::on(&main)
            .caption("Correlation Matrix", (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(label_area_width(&labels))
            .build_cartesian_2d(0f64..k as f64, 0f64..k as f64)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .draw()?;

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let fill = if r.is_nan() {
                UNDEFINED_COLOR
            } else {
                let (red, green, blue) = coolwarm(r);
                RGBColor(red, green, blue)
            };
            let x = j as f64;
            Rectangle::new([(x, top_of(i) - 1.0), (x + 1.0, top_of(i))], fill.filled())
        }))?;

        chart.draw_series(cells.iter().map(|&(i, j, r)| {
            let text = if r.is_nan() {
                "nan".to_string()
            } else {
                format!("{r:.2}")
            };
            let color = if r.abs() > 0.6 { WHITE } else { BLACK };
            let style = (FONT_FAMILY, 16)
                .into_font()
                .color(&color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            Text::new(text, (j as f64 + 0.5, top_of(i) - 0.5), style)
        }))?;

        let (left, top) = chart.backend_coord(&(0.0, k as f64));
        let (right, bottom) = chart.backend_coord(&(k as f64, 0.0));
        let x_stride = label_stride(right - left, k, LABEL_SIZE as i32 * 4);
        let x_style = label_style(HPos::Center, VPos::Top);
        for (idx, label) in labels.iter().enumerate().step_by(x_stride) {
            let (x, y) = chart.backend_coord(&(idx as f64 + 0.5, 0.0));
            root.draw(&Text::new(label.as_str(), (x, y + 6), x_style.clone()))?;
        }
        let y_stride = label_stride(bottom - top, k, LABEL_SIZE as i32 + 2);
        let y_style = label_style(HPos::Right, VPos::Center);
        for (idx, label) in labels.iter().enumerate().step_by(y_stride) {
            let (x, y) = chart.backend_coord(&(0.0, top_of(idx) - 0.5));
            root.draw(&Text::new(label.as_str(), (x - 6, y), y_style.clone()))?;
        }

        draw_colorbar(&legend)
    })
}

fn draw_colorbar(area: &DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()> {
    let mut bar = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(52)
        .margin_right(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .draw()?;

    let step = 2.0 / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|s| {
        let lo = -1.0 + step * s as f64;
        let (red, green, blue) = coolwarm(lo + step / 2.0);
        Rectangle::new([(0.0, lo), (1.0, lo + step)], RGBColor(red, green, blue).filled())
    }))?;
    Ok(())
}

/// Row-by-column matrix of missing cells, light where a value is missing.
///
/// `masks` holds one flag per row for every column in `names`.
pub(super) fn draw_missing(
    path: &Path,
    names: &[String],
    masks: &[Vec<bool>],
    rows: usize,
) -> Result<()> {
    let labels: Vec<String> = names
        .iter()
        .map(|name| truncate_label(name, MAX_LABEL_CHARS))
        .collect();
    let width = names.len().max(1) as f64;
    let height = rows.max(1) as f64;

    with_canvas(path, MISSING_SIZE, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption("Missing Values Heatmap", (FONT_FAMILY, TITLE_SIZE))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0f64..width, 0f64..height)?;

        chart.plotting_area().fill(&PRESENT_COLOR)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(0)
            .y_labels(10)
            .y_label_formatter(&|y| format!("{}", (height - y).round() as i64))
            .draw()?;

        chart.draw_series(masks.iter().enumerate().flat_map(|(col, mask)| {
            let x = col as f64;
            missing_runs(mask).into_iter().map(move |(start, len)| {
                Rectangle::new(
                    [
                        (x, height - (start + len) as f64),
                        (x + 1.0, height - start as f64),
                    ],
                    MISSING_COLOR.filled(),
                )
            })
        }))?;

        let (left, _) = chart.backend_coord(&(0.0, 0.0));
        let (right, _) = chart.backend_coord(&(width, 0.0));
        let stride = label_stride(right - left, names.len(), LABEL_SIZE as i32 * 4);
        let style = label_style(HPos::Center, VPos::Top);
        for (idx, label) in labels.iter().enumerate().step_by(stride) {
            let (x, y) = chart.backend_coord(&(idx as f64 + 0.5, 0.0));
            root.draw(&Text::new(label.as_str(), (x, y + 6), style.clone()))?;
        }
        Ok(())
    })
}

/// Runs of consecutive missing rows as `(first row, length)`.
fn missing_runs(mask: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (row, missing) in mask.iter().enumerate() {
        match (start, *missing) {
            (None, true) => start = Some(row),
            (Some(first), false) => {
                runs.push((first, row - first));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(first) = start {
        runs.push((first, mask.len() - first));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn assert_png(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE), "{} is not a PNG", path.display());
    }

    #[test]
    fn test_missing_runs() {
        assert_eq!(missing_runs(&[]), vec![]);
        assert_eq!(missing_runs(&[false, false]), vec![]);
        assert_eq!(
            missing_runs(&[true, true, false, true, false, false, true]),
            vec![(0, 2), (3, 1), (6, 1)]
        );
    }

    #[test]
    fn test_draw_histogram() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hist_x.png");
        let values: Vec<f64> = (0..50).map(|i| f64::from(i % 7)).collect();
        draw_histogram(&path, "x", &values).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_histogram_without_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hist_empty.png");
        draw_histogram(&path, "empty", &[]).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_histogram_with_extreme_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hist_x.png");
        draw_histogram(&path, "x", &[-1e308, 1e308, 0.0, f64::INFINITY]).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_bar_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bar_city.png");
        let counts = vec![("Oslo".to_string(), 3), ("Lima".to_string(), 1)];
        draw_bar_chart(&path, "city", &counts).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_bar_chart_with_many_categories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bar_id.png");
        let counts: Vec<(String, usize)> = (0..3000).map(|i| (format!("id-{i}"), 1)).collect();
        draw_bar_chart(&path, "id", &counts).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_correlation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("correlation_matrix.png");
        let names = vec!["a".to_string(), "b".to_string()];
        let matrix = vec![vec![1.0, -0.25], vec![-0.25, f64::NAN]];
        draw_correlation(&path, &names, &matrix).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_values.png");
        let names = vec!["a".to_string(), "b".to_string()];
        let masks = vec![vec![false, true, true], vec![false, false, false]];
        draw_missing(&path, &names, &masks, 3).unwrap();
        assert_png(&path);
    }

    #[test]
    fn test_draw_missing_without_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing_values.png");
        draw_missing(&path, &["a".to_string()], &[vec![]], 0).unwrap();
        assert_png(&path);
    }
}
