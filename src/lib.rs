//! Correlation heatmap for synthetic customer-engagement metrics.
//!
//! The crate runs a three-stage pipeline:
//!
//! 1. [`synthesis`] fabricates a seeded 100 x 6 table of integer engagement
//!    metrics, two of which are derived from the others so that the table has
//!    some real correlation structure.
//! 2. [`math::correlation`] computes the pairwise Pearson correlation matrix.
//! 3. [`render`] draws the matrix as an annotated diverging heatmap and writes
//!    it to a fixed-size PNG.
//!
//! # Example
//!
//! ```ignore
//! use engagement_heatmap::HeatmapBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = HeatmapBuilder::new().output("chart.png").run()?;
//!     report.matrix().summary();
//!     Ok(())
//! }
//! ```

use getset::Getters;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod config;
pub mod math;
pub mod palette;
pub mod render;
pub mod synthesis;

pub use crate::config::ChartStyle;
pub use crate::math::correlation::{correlation_matrix, pearson, CorrelationMatrix};
pub use crate::render::render_heatmap;
pub use crate::synthesis::{generate_engagement_table, ENGAGEMENT_COLUMNS, N_ROWS};

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// File the heatmap is written to when no output path is given.
pub const DEFAULT_OUTPUT: &str = "chart.png";

/// Error type for the `engagement_heatmap` library.
#[derive(Error, Debug)]
pub enum HeatmapError {
    /// Wraps a `PolarsError`.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    /// A column the pipeline expects is missing from the table.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    /// The plotting backend failed to draw or encode the image.
    #[error("Plot error: {0}")]
    Plot(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configures and runs the synthesize, correlate, render pipeline.
///
/// The defaults reproduce the canonical chart: seed 42, `chart.png`,
/// an 8 x 8 inch canvas at 64 dpi.
#[derive(Debug, Clone)]
pub struct HeatmapBuilder {
    seed: u64,
    output: PathBuf,
    style: ChartStyle,
}

impl Default for HeatmapBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapBuilder {
    pub fn new() -> Self {
        Self {
            seed: DEFAULT_SEED,
            output: PathBuf::from(DEFAULT_OUTPUT),
            style: ChartStyle::default(),
        }
    }

    /// Sets the seed for the synthetic table.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the path of the PNG file. An existing file is overwritten.
    pub fn output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    pub fn style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Runs the full pipeline and writes the image.
    pub fn run(&self) -> Result<HeatmapReport, HeatmapError> {
        let table = generate_engagement_table(self.seed)?;
        debug!(
            seed = self.seed,
            rows = table.height(),
            columns = table.width(),
            "synthesized engagement table"
        );

        let matrix = correlation_matrix(&table)?;
        debug!(size = matrix.len(), "computed correlation matrix");

        render_heatmap(&matrix, &self.style, &self.output)?;
        let dimensions = self.style.pixel_size();
        info!(
            path = %self.output.display(),
            width = dimensions.0,
            height = dimensions.1,
            "wrote heatmap"
        );

        Ok(HeatmapReport {
            table,
            matrix,
            output: self.output.clone(),
            dimensions,
        })
    }
}

/// Everything produced by a single [`HeatmapBuilder::run`].
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct HeatmapReport {
    /// The synthetic table the matrix was computed from.
    table: DataFrame,
    matrix: CorrelationMatrix,
    /// Where the PNG was written.
    output: PathBuf,
    /// Pixel size of the PNG as `(width, height)`.
    dimensions: (u32, u32),
}

impl HeatmapReport {
    /// The line printed by the binary after a successful run.
    pub fn confirmation(&self) -> String {
        format!(
            "{} has been generated successfully with {}x{} dimensions.",
            self.output.display(),
            self.dimensions.0,
            self.dimensions.1
        )
    }

    /// Writes the synthetic table as CSV.
    pub fn write_table_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), HeatmapError> {
        let mut file = std::fs::File::create(path)?;
        let mut df = self.table.clone();
        CsvWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }
}
