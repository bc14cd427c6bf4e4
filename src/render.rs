//! Rendering of a correlation matrix as an annotated heatmap PNG.
//!
//! The figure is laid out directly in pixel space so the exported raster has
//! exactly the size given by [`ChartStyle::pixel_size`]: a centered title
//! band, row labels on the left, rotated column labels below the grid and a
//! vertical color bar to the right.
use crate::config::ChartStyle;
use crate::math::correlation::CorrelationMatrix;
use crate::palette::{annotation_color, color_for_value};
use crate::HeatmapError;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::Path;
use tracing::debug;

const FONT_FAMILY: &str = "sans-serif";

/// Number of bands the color bar gradient is drawn with.
const COLORBAR_STEPS: i32 = 128;

/// Ticks shown on the color bar, as fractions of the value range.
const COLORBAR_TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Approximate advance of one glyph relative to the font size.
const GLYPH_WIDTH_RATIO: f64 = 0.55;

/// Pixel geometry of the figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub canvas: (u32, u32),
    pub title_anchor: (i32, i32),
    /// Top-left pixel of the cell grid.
    pub grid_origin: (i32, i32),
    /// Side of one square cell.
    pub cell: i32,
    pub n: usize,
    /// Top-left and bottom-right corners of the color bar.
    pub colorbar: ((i32, i32), (i32, i32)),
    pub line_px: i32,
    pub label_pad: i32,
}

impl Layout {
    /// Computes the layout for a matrix with one row and column per label.
    pub fn compute(style: &ChartStyle, labels: &[String]) -> Layout {
        let (width, height) = style.pixel_size();
        let (w, h) = (width as i32, height as i32);
        let n = labels.len().max(1) as i32;

        let margin = style.points_to_px(6.0) as i32;
        let title_h = 2 * style.points_to_px(style.title_font_pt) as i32;
        let tick_px = style.points_to_px(style.tick_font_pt) as f64;
        let label_pad = style.points_to_px(5.0) as i32;
        let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let label_band = (longest as f64 * tick_px * GLYPH_WIDTH_RATIO).ceil() as i32 + label_pad;

        let cbar_gap = style.points_to_px(14.0) as i32;
        let cbar_w = style.points_to_px(12.0) as i32;
        let cbar_labels = 3 * style.points_to_px(style.colorbar_font_pt) as i32;

        let avail_w = w - 2 * margin - label_band - cbar_gap - cbar_w - cbar_labels;
        let avail_h = h - 2 * margin - title_h - label_band;
        let cell = (avail_w.min(avail_h) / n).max(1);
        let side = cell * n;

        let grid_origin = (margin + label_band, margin + title_h);
        let cbar_x = grid_origin.0 + side + cbar_gap;
        Layout {
            canvas: (width, height),
            title_anchor: (w / 2, margin + title_h / 2),
            grid_origin,
            cell,
            n: labels.len(),
            colorbar: (
                (cbar_x, grid_origin.1),
                (cbar_x + cbar_w, grid_origin.1 + side),
            ),
            line_px: style.points_to_px(style.grid_line_pt) as i32,
            label_pad,
        }
    }

    /// Pixel rectangle of cell `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> ((i32, i32), (i32, i32)) {
        let x0 = self.grid_origin.0 + col as i32 * self.cell;
        let y0 = self.grid_origin.1 + row as i32 * self.cell;
        ((x0, y0), (x0 + self.cell, y0 + self.cell))
    }

    pub fn grid_side(&self) -> i32 {
        self.cell * self.n as i32
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> HeatmapError {
    HeatmapError::Plot(e.to_string())
}

/// Draws `matrix` as an annotated heatmap and writes it to `path` as PNG.
///
/// Any existing file at `path` is overwritten.
pub fn render_heatmap(
    matrix: &CorrelationMatrix,
    style: &ChartStyle,
    path: &Path,
) -> Result<(), HeatmapError> {
    let layout = Layout::compute(style, matrix.labels());
    debug!(?layout, path = %path.display(), "rendering heatmap");

    let root = BitMapBackend::new(path, layout.canvas).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    draw_title(&root, style, &layout)?;
    draw_cells(&root, matrix, style, &layout)?;
    draw_tick_labels(&root, matrix, style, &layout)?;
    draw_colorbar(&root, style, &layout)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_title(root: &Area, style: &ChartStyle, layout: &Layout) -> Result<(), HeatmapError> {
    let font = (FONT_FAMILY, style.points_to_px(style.title_font_pt) as f64)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(style.title.as_str(), layout.title_anchor, font))
        .map_err(plot_err)
}

fn draw_cells(
    root: &Area,
    matrix: &CorrelationMatrix,
    style: &ChartStyle,
    layout: &Layout,
) -> Result<(), HeatmapError> {
    let font_px = style.points_to_px(style.annotation_font_pt) as f64;
    for row in 0..layout.n {
        for col in 0..layout.n {
            let value = matrix.get(row, col).unwrap_or(f64::NAN);
            let fill = color_for_value(value, style.value_range);
            let (top_left, bottom_right) = layout.cell_rect(row, col);
            root.draw(&Rectangle::new([top_left, bottom_right], fill.filled()))
                .map_err(plot_err)?;

            let text_color = annotation_color(fill);
            let text_style = (FONT_FAMILY, font_px)
                .into_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            let center = (
                (top_left.0 + bottom_right.0) / 2,
                (top_left.1 + bottom_right.1) / 2,
            );
            root.draw(&Text::new(format!("{:.2}", value), center, text_style))
                .map_err(plot_err)?;
        }
    }

    // Separators between cells.
    let (gx, gy) = layout.grid_origin;
    let side = layout.grid_side();
    let half = layout.line_px / 2;
    for k in 1..layout.n as i32 {
        let offset = k * layout.cell;
        root.draw(&Rectangle::new(
            [(gx + offset - half, gy), (gx + offset - half + layout.line_px, gy + side)],
            WHITE.filled(),
        ))
        .map_err(plot_err)?;
        root.draw(&Rectangle::new(
            [(gx, gy + offset - half), (gx + side, gy + offset - half + layout.line_px)],
            WHITE.filled(),
        ))
        .map_err(plot_err)?;
    }
    Ok(())
}

fn draw_tick_labels(
    root: &Area,
    matrix: &CorrelationMatrix,
    style: &ChartStyle,
    layout: &Layout,
) -> Result<(), HeatmapError> {
    let font_px = style.points_to_px(style.tick_font_pt) as f64;
    let (gx, gy) = layout.grid_origin;
    let bottom = gy + layout.grid_side();

    for (i, label) in matrix.labels().iter().enumerate() {
        let middle = i as i32 * layout.cell + layout.cell / 2;

        let row_style = (FONT_FAMILY, font_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        root.draw(&Text::new(label.as_str(), (gx - layout.label_pad, gy + middle), row_style))
            .map_err(plot_err)?;

        let col_style = (FONT_FAMILY, font_px)
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Right, VPos::Center));
        root.draw(&Text::new(label.as_str(), (gx + middle, bottom + layout.label_pad), col_style))
            .map_err(plot_err)?;
    }
    Ok(())
}

fn draw_colorbar(root: &Area, style: &ChartStyle, layout: &Layout) -> Result<(), HeatmapError> {
    let ((x0, y0), (x1, y1)) = layout.colorbar;
    let height = (y1 - y0) as f64;
    let (lo, hi) = style.value_range;

    // Bottom of the bar is the low end of the range.
    for step in 0..COLORBAR_STEPS {
        let band_top = y1 - ((step + 1) as f64 * height / COLORBAR_STEPS as f64).round() as i32;
        let band_bottom = y1 - (step as f64 * height / COLORBAR_STEPS as f64).round() as i32;
        let t = (step as f64 + 0.5) / COLORBAR_STEPS as f64;
        let color = color_for_value(lo + t * (hi - lo), style.value_range);
        root.draw(&Rectangle::new([(x0, band_top), (x1, band_bottom)], color.filled()))
            .map_err(plot_err)?;
    }
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.mix(0.6).stroke_width(1)))
        .map_err(plot_err)?;

    let font_px = style.points_to_px(style.colorbar_font_pt) as f64;
    let tick_len = style.points_to_px(3.0) as i32;
    for frac in COLORBAR_TICKS {
        let y = y1 - (frac * height).round() as i32;
        root.draw(&Rectangle::new([(x1, y), (x1 + tick_len, y + 1)], BLACK.filled()))
            .map_err(plot_err)?;
        let label_style = (FONT_FAMILY, font_px)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        let value = lo + frac * (hi - lo);
        root.draw(&Text::new(format!("{:.1}", value), (x1 + tick_len + 2, y), label_style))
            .map_err(plot_err)?;
    }
    Ok(())
}
