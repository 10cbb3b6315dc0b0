// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout plan — the single geometry value shared by the preview and the
// renderer. Build it from (config, artwork size, offset); everything
// downstream reads from it rather than recomputing the formulas.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{
    GridGeometry, PlacementOffset, PrintJobConfig, PxRect, RectCm, RenderedArtworkSize,
    SheetPosition,
};
use tracing::debug;

use crate::coords::{CoordinateTransformer, RasterGrid};
use crate::cover::{CoverFitCalculator, FitAxis};
use crate::grid::GridLayoutCalculator;

/// Resolved geometry for one artwork on one sheet grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPlan {
    config: PrintJobConfig,
    grid: GridGeometry,
    rendered: RenderedArtworkSize,
    offset: PlacementOffset,
    artwork_aspect: f64,
    fit_axis: FitAxis,
}

impl LayoutPlan {
    /// Plan a layout for an artwork of `artwork_width_px` x `artwork_height_px`
    /// (after crop and rotation) placed at `offset`.
    pub fn new(
        config: &PrintJobConfig,
        artwork_width_px: u32,
        artwork_height_px: u32,
        offset: PlacementOffset,
    ) -> Result<Self> {
        offset.validate()?;
        let grid = GridLayoutCalculator::geometry(config)?;
        let artwork_aspect = CoverFitCalculator::aspect_ratio(artwork_width_px, artwork_height_px)?;
        let rendered = CoverFitCalculator::fit(&grid, artwork_aspect)?;
        let fit_axis = CoverFitCalculator::fit_axis(artwork_aspect, grid.aspect_ratio());

        Ok(Self {
            config: *config,
            grid,
            rendered,
            offset,
            artwork_aspect,
            fit_axis,
        })
    }

    /// Same layout with the artwork moved. Cheap: nothing is refitted.
    pub fn with_offset(&self, offset: PlacementOffset) -> Result<Self> {
        offset.validate()?;
        Ok(Self { offset, ..*self })
    }

    pub fn config(&self) -> &PrintJobConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    pub fn rendered(&self) -> &RenderedArtworkSize {
        &self.rendered
    }

    pub fn offset(&self) -> PlacementOffset {
        self.offset
    }

    pub fn artwork_aspect(&self) -> f64 {
        self.artwork_aspect
    }

    pub fn fit_axis(&self) -> FitAxis {
        self.fit_axis
    }

    pub fn transformer(&self) -> CoordinateTransformer {
        CoordinateTransformer::new(self.grid, self.rendered, self.offset)
    }

    /// Every sheet's global rectangle, row-major.
    pub fn sheet_rects(&self) -> Vec<(SheetPosition, RectCm)> {
        let coords = self.transformer();
        self.config
            .sheets()
            .map(|position| (position, coords.sheet_rect(position)))
            .collect()
    }

    /// Offsets that keep the grid fully covered by the artwork.
    pub fn pan_range(&self) -> PanRange {
        PanRange {
            min_x_cm: (self.grid.grid_width_cm - self.rendered.width_cm).min(0.0),
            max_x_cm: 0.0,
            min_y_cm: (self.grid.grid_height_cm - self.rendered.height_cm).min(0.0),
            max_y_cm: 0.0,
        }
    }

    /// Offset that centres the overflowing axis on the grid.
    pub fn centered_offset(&self) -> PlacementOffset {
        let range = self.pan_range();
        PlacementOffset::new(range.min_x_cm / 2.0, range.min_y_cm / 2.0)
    }

    /// Quantise the plan to output pixels at `dpi`.
    pub fn raster(&self, dpi: u32) -> Result<RasterLayout> {
        let grid = RasterGrid::new(&self.grid, dpi)?;
        let (width, height) = CoverFitCalculator::fit_px(
            self.fit_axis,
            grid.grid_width_px,
            grid.grid_height_px,
            self.artwork_aspect,
        );
        let artwork = PxRect::new(
            grid.to_raster(self.offset.offset_x_cm)?,
            grid.to_raster(self.offset.offset_y_cm)?,
            width,
            height,
        );

        let sheets: Vec<RasterSheet> = self
            .config
            .sheets()
            .map(|position| RasterSheet {
                position,
                page_number: position.page_number(self.config.cols),
                label: position.label(),
                rect: grid.sheet_rect(position),
            })
            .collect();

        if sheets.len() != self.config.sheet_count as usize {
            return Err(TilewerkError::geometry(format!(
                "planned {} sheets for a {}-sheet job",
                sheets.len(),
                self.config.sheet_count
            )));
        }
        let last = sheets[sheets.len() - 1].rect;
        if last.right() != grid.grid_width_px as i64 || last.bottom() != grid.grid_height_px as i64
        {
            return Err(TilewerkError::geometry(format!(
                "last sheet ends at ({}, {}) but the grid is {}x{} px",
                last.right(),
                last.bottom(),
                grid.grid_width_px,
                grid.grid_height_px
            )));
        }

        debug!(
            dpi,
            grid_w = grid.grid_width_px,
            grid_h = grid.grid_height_px,
            art_x = artwork.x,
            art_y = artwork.y,
            art_w = artwork.width,
            art_h = artwork.height,
            "Raster layout planned"
        );

        Ok(RasterLayout {
            grid,
            artwork,
            sheets,
        })
    }
}

/// Allowed offset interval, in cm, that leaves no blank paper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanRange {
    pub min_x_cm: f64,
    pub max_x_cm: f64,
    pub min_y_cm: f64,
    pub max_y_cm: f64,
}

impl PanRange {
    pub fn clamp(&self, offset: PlacementOffset) -> PlacementOffset {
        PlacementOffset::new(
            offset.offset_x_cm.clamp(self.min_x_cm, self.max_x_cm),
            offset.offset_y_cm.clamp(self.min_y_cm, self.max_y_cm),
        )
    }

    pub fn contains(&self, offset: PlacementOffset) -> bool {
        (self.min_x_cm..=self.max_x_cm).contains(&offset.offset_x_cm)
            && (self.min_y_cm..=self.max_y_cm).contains(&offset.offset_y_cm)
    }
}

/// A plan quantised to output pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterLayout {
    pub grid: RasterGrid,
    /// Artwork placement in global raster pixels.
    pub artwork: PxRect,
    /// Row-major.
    pub sheets: Vec<RasterSheet>,
}

impl RasterLayout {
    /// Part of the artwork that lands on any sheet, in global raster pixels.
    pub fn visible_artwork(&self) -> Option<PxRect> {
        self.artwork.intersect(&self.grid.bounds())
    }
}

/// One sheet of a raster layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterSheet {
    pub position: SheetPosition,
    pub page_number: u32,
    pub label: String,
    /// Global raster rectangle, always exactly paper-sized.
    pub rect: PxRect,
}
