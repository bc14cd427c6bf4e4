//! Visual settings for the rendered heatmap.
use crate::HeatmapError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Styling for the heatmap image.
///
/// Sizes follow the print convention: the canvas is given in inches and
/// converted to pixels through `dpi`, and fonts are given in points
/// (1/72 inch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub title: String,
    /// Canvas width and height in inches.
    pub canvas_inches: (f64, f64),
    /// Pixels per inch of the exported raster.
    pub dpi: u32,
    pub title_font_pt: f64,
    pub tick_font_pt: f64,
    pub annotation_font_pt: f64,
    pub colorbar_font_pt: f64,
    /// Values mapped to the two ends of the color scale.
    pub value_range: (f64, f64),
    /// Width of the separators drawn between cells, in points.
    pub grid_line_pt: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            title: "Customer Engagement Metrics Correlation Matrix".to_string(),
            canvas_inches: (8.0, 8.0),
            dpi: 64,
            title_font_pt: 16.0,
            tick_font_pt: 11.0,
            annotation_font_pt: 11.0,
            colorbar_font_pt: 10.0,
            value_range: (-1.0, 1.0),
            grid_line_pt: 1.5,
        }
    }
}

impl ChartStyle {
    /// Loads a style from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, HeatmapError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Size of the exported raster as `(width, height)` in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.canvas_inches.0 * dpi).round() as u32,
            (self.canvas_inches.1 * dpi).round() as u32,
        )
    }

    /// Converts a size in points to whole pixels at this style's dpi.
    pub fn points_to_px(&self, points: f64) -> u32 {
        (points * self.dpi as f64 / 72.0).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pixel_size_is_512_square() {
        let style = ChartStyle::default();
        assert_eq!(style.pixel_size(), (512, 512));
    }

    #[test]
    fn test_points_to_px() {
        let style = ChartStyle::default();
        // 72 pt is one inch.
        assert_eq!(style.points_to_px(72.0), 64);
        assert_eq!(style.points_to_px(0.1), 1);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let style: ChartStyle = serde_json::from_str(r#"{"dpi": 100}"#).unwrap();
        assert_eq!(style.dpi, 100);
        assert_eq!(style.canvas_inches, (8.0, 8.0));
        assert_eq!(style.pixel_size(), (800, 800));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.json");
        std::fs::write(&path, r#"{"title": "Engagement", "dpi": 32}"#).unwrap();
        let style = ChartStyle::from_json_file(&path).unwrap();
        assert_eq!(style.title, "Engagement");
        assert_eq!(style.pixel_size(), (256, 256));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ChartStyle::from_json_file(&path),
            Err(HeatmapError::Serialization(_))
        ));
        assert!(matches!(
            ChartStyle::from_json_file(dir.path().join("missing.json")),
            Err(HeatmapError::Io(_))
        ));
    }
}
