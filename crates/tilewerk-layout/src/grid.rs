// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grid layout — fixed cols x rows per sheet count, and the printable area
// those sheets cover once neighbours overlap.

use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{
    GridGeometry, Orientation, PaperSize, PrintJobConfig, SUPPORTED_SHEET_COUNTS,
};
use tracing::{debug, instrument};

/// Maps a sheet count to its grid and computes the grid's physical size.
pub struct GridLayoutCalculator;

impl GridLayoutCalculator {
    /// Columns and rows for `sheet_count` sheets.
    ///
    /// | sheets | portrait | landscape |
    /// |--------|----------|-----------|
    /// | 1      | 1x1      | 1x1       |
    /// | 2      | 2x1      | 1x2       |
    /// | 4      | 2x2      | 2x2       |
    /// | 6      | 3x2      | 3x2       |
    /// | 8      | 4x2      | 4x2       |
    pub fn dimensions(sheet_count: u32, orientation: Orientation) -> Result<(u32, u32)> {
        let dims = match (sheet_count, orientation) {
            (1, _) => (1, 1),
            (2, Orientation::Portrait) => (2, 1),
            (2, Orientation::Landscape) => (1, 2),
            (4, _) => (2, 2),
            (6, _) => (3, 2),
            (8, _) => (4, 2),
            _ => {
                return Err(TilewerkError::validation(format!(
                    "sheet count must be one of {:?}, got {}",
                    SUPPORTED_SHEET_COUNTS, sheet_count
                )));
            }
        };
        Ok(dims)
    }

    /// Build a validated job configuration for `sheet_count` sheets of
    /// `paper` in `orientation`.
    #[instrument(level = "debug")]
    pub fn job_config(
        paper: PaperSize,
        orientation: Orientation,
        sheet_count: u32,
        overlap_cm: f64,
    ) -> Result<PrintJobConfig> {
        let (cols, rows) = Self::dimensions(sheet_count, orientation)?;
        let (paper_width_cm, paper_height_cm) = paper.dimensions_cm(orientation);
        let config = PrintJobConfig {
            paper_width_cm,
            paper_height_cm,
            overlap_cm,
            sheet_count,
            cols,
            rows,
        };
        config.validate()?;
        debug!(cols, rows, paper_width_cm, paper_height_cm, "Job layout resolved");
        Ok(config)
    }

    /// Physical size of the grid: sheets overlap their neighbour's strip
    /// rather than sitting edge to edge.
    ///
    /// `grid = n * paper - (n - 1) * overlap` along each axis.
    pub fn geometry(config: &PrintJobConfig) -> Result<GridGeometry> {
        config.validate()?;

        let effective_cell_width_cm = config.paper_width_cm - config.overlap_cm;
        let effective_cell_height_cm = config.paper_height_cm - config.overlap_cm;
        let grid_width_cm = config.cols as f64 * config.paper_width_cm
            - (config.cols as f64 - 1.0) * config.overlap_cm;
        let grid_height_cm = config.rows as f64 * config.paper_height_cm
            - (config.rows as f64 - 1.0) * config.overlap_cm;

        if !(grid_width_cm > 0.0 && grid_height_cm > 0.0) {
            return Err(TilewerkError::geometry(format!(
                "grid {grid_width_cm}x{grid_height_cm} cm is not positive"
            )));
        }

        Ok(GridGeometry {
            cols: config.cols,
            rows: config.rows,
            paper_width_cm: config.paper_width_cm,
            paper_height_cm: config.paper_height_cm,
            overlap_cm: config.overlap_cm,
            grid_width_cm,
            grid_height_cm,
            effective_cell_width_cm,
            effective_cell_height_cm,
        })
    }
}
