//! Drawing surface shared by every chart.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use std::path::Path;

/// Family name every text element is drawn with.
pub(super) const FONT_FAMILY: &str = "sans-serif";

const FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static FONT_REGISTERED: OnceCell<()> = OnceCell::new();

pub(super) const TITLE_SIZE: u32 = 22;
pub(super) const LABEL_SIZE: u32 = 14;

pub(super) const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
pub(super) const LINE_COLOR: RGBColor = RGBColor(31, 58, 104);
pub(super) const UNDEFINED_COLOR: RGBColor = RGBColor(200, 200, 200);
pub(super) const PRESENT_COLOR: RGBColor = RGBColor(3, 5, 26);
pub(super) const MISSING_COLOR: RGBColor = RGBColor(250, 235, 221);

/// Register the bundled font under [`FONT_FAMILY`]. Runs once per process.
fn ensure_font() -> Result<()> {
    FONT_REGISTERED
        .get_or_try_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES)
                .map_err(|_| anyhow!("bundled chart font could not be loaded"))
        })
        .map(|_| ())
}

/// Draw one PNG image.
///
/// The backend lives only for this call: the area is cleared to white,
/// handed to `draw`, then flushed to `path`.
pub(super) fn with_canvas<F>(path: &Path, size: (u32, u32), draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<()>,
{
    ensure_font()?;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    draw(&root)?;
    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Text style for category labels placed outside a chart's plotting area.
pub(super) fn label_style(hpos: HPos, vpos: VPos) -> TextStyle<'static> {
    (FONT_FAMILY, LABEL_SIZE)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(hpos, vpos))
}

/// Pixels reserved for the longest of `labels`, within sensible limits.
pub(super) fn label_area_width(labels: &[String]) -> i32 {
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    (longest * LABEL_SIZE as i32 * 3 / 5 + 16).clamp(40, 260)
}

/// Draw every n-th of `slots` category labels spread over `axis_px` pixels
/// so neighbours do not overlap.
///
/// An axis with no room for a label gets a stride past the last slot, so
/// only the first label is drawn.
pub(super) fn label_stride(axis_px: i32, slots: usize, needed_px: i32) -> usize {
    let slots = slots.max(1);
    let slot_px = f64::from(axis_px.abs()) / slots as f64;
    if slot_px <= 0.0 {
        return slots;
    }
    let stride = (f64::from(needed_px) / slot_px).ceil();
    if stride >= slots as f64 {
        slots
    } else {
        (stride as usize).max(1)
    }
}

/// Shorten a label for display, keeping its start.
pub(super) fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}
