// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate spaces.
//
// - Global space: centimetres, origin at the grid's top-left corner.
// - Preview canvas: screen pixels, global space scaled and centred to fit a
//   canvas of a given size.
// - Output raster: pixels at the export DPI. Sheet geometry is quantised once
//   (paper, overlap, stride) so neighbouring sheets are windows onto the same
//   global pixel grid.

use serde::{Deserialize, Serialize};
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{
    GridGeometry, PlacementOffset, PxRect, RectCm, RenderedArtworkSize, SheetPosition,
};
use tilewerk_core::units;

/// Global-space positions of the artwork and of every sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransformer {
    grid: GridGeometry,
    rendered: RenderedArtworkSize,
    offset: PlacementOffset,
}

impl CoordinateTransformer {
    pub fn new(grid: GridGeometry, rendered: RenderedArtworkSize, offset: PlacementOffset) -> Self {
        Self {
            grid,
            rendered,
            offset,
        }
    }

    pub fn grid(&self) -> &GridGeometry {
        &self.grid
    }

    /// `[offset_x, offset_x + width] x [offset_y, offset_y + height]`.
    pub fn artwork_rect(&self) -> RectCm {
        RectCm::new(
            self.offset.offset_x_cm,
            self.offset.offset_y_cm,
            self.rendered.width_cm,
            self.rendered.height_cm,
        )
    }

    /// A full paper-sized rectangle whose top-left sits at
    /// `(col * effective_width, row * effective_height)`. Neighbours overlap
    /// by the overlap strip.
    pub fn sheet_rect(&self, position: SheetPosition) -> RectCm {
        RectCm::new(
            position.col as f64 * self.grid.effective_cell_width_cm,
            position.row as f64 * self.grid.effective_cell_height_cm,
            self.grid.paper_width_cm,
            self.grid.paper_height_cm,
        )
    }

    /// Part of the sheet covered by artwork, in global space.
    pub fn sheet_artwork_overlap(&self, position: SheetPosition) -> Option<RectCm> {
        self.sheet_rect(position).intersect(&self.artwork_rect())
    }

    /// Convert a global point into the sheet's own coordinates.
    pub fn to_sheet_local(&self, position: SheetPosition, x_cm: f64, y_cm: f64) -> (f64, f64) {
        let sheet = self.sheet_rect(position);
        (x_cm - sheet.x, y_cm - sheet.y)
    }
}

/// Rectangle in preview canvas pixels. Unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Mapping between global space and a preview canvas.
///
/// `scale = min(canvas_w * margin / grid_w_px, canvas_h * margin / grid_h_px, 1)`
/// with `grid_*_px = grid_*_cm * px_per_cm`; the scaled grid is centred.
/// `to_canvas(cm) = viewport_offset + cm * px_per_cm * scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewViewport {
    pub canvas_width_px: f64,
    pub canvas_height_px: f64,
    pub px_per_cm: f64,
    pub scale: f64,
    pub offset_x_px: f64,
    pub offset_y_px: f64,
}

impl PreviewViewport {
    pub fn fit(
        canvas_width_px: f64,
        canvas_height_px: f64,
        margin: f64,
        px_per_cm: f64,
        grid: &GridGeometry,
    ) -> Result<Self> {
        for (name, value) in [
            ("canvas width", canvas_width_px),
            ("canvas height", canvas_height_px),
            ("pixels per cm", px_per_cm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TilewerkError::validation(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !(margin > 0.0 && margin <= 1.0) {
            return Err(TilewerkError::validation(format!(
                "preview margin must be in (0, 1], got {margin}"
            )));
        }

        let grid_width_px = grid.grid_width_cm * px_per_cm;
        let grid_height_px = grid.grid_height_cm * px_per_cm;
        let scale = (canvas_width_px * margin / grid_width_px)
            .min(canvas_height_px * margin / grid_height_px)
            .min(1.0);

        Ok(Self {
            canvas_width_px,
            canvas_height_px,
            px_per_cm,
            scale,
            offset_x_px: (canvas_width_px - grid_width_px * scale) / 2.0,
            offset_y_px: (canvas_height_px - grid_height_px * scale) / 2.0,
        })
    }

    /// Canvas pixels per global centimetre.
    pub fn zoom(&self) -> f64 {
        self.px_per_cm * self.scale
    }

    pub fn to_canvas(&self, x_cm: f64, y_cm: f64) -> (f64, f64) {
        (
            self.offset_x_px + x_cm * self.zoom(),
            self.offset_y_px + y_cm * self.zoom(),
        )
    }

    pub fn from_canvas(&self, x_px: f64, y_px: f64) -> (f64, f64) {
        (
            (x_px - self.offset_x_px) / self.zoom(),
            (y_px - self.offset_y_px) / self.zoom(),
        )
    }

    pub fn to_canvas_rect(&self, rect: &RectCm) -> CanvasRect {
        let (x, y) = self.to_canvas(rect.x, rect.y);
        CanvasRect {
            x,
            y,
            width: rect.width * self.zoom(),
            height: rect.height * self.zoom(),
        }
    }

    pub fn from_canvas_rect(&self, rect: &CanvasRect) -> RectCm {
        let (x, y) = self.from_canvas(rect.x, rect.y);
        RectCm::new(x, y, rect.width / self.zoom(), rect.height / self.zoom())
    }

    /// Global-space distance for a pointer movement of `(dx, dy)` canvas pixels.
    pub fn delta_to_cm(&self, dx_px: f64, dy_px: f64) -> (f64, f64) {
        (dx_px / self.zoom(), dy_px / self.zoom())
    }
}

/// Sheet grid quantised to output pixels at one DPI.
///
/// `paper_px = round(paper_cm * dpi / 2.54)`, `overlap_px` likewise, and
/// `stride_px = paper_px - overlap_px`. Sheet `(c, r)` starts at
/// `(c * stride_x, r * stride_y)`, so the last `overlap_px` columns of one
/// sheet are the first `overlap_px` columns of its right neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterGrid {
    pub dpi: u32,
    pub cols: u32,
    pub rows: u32,
    pub paper_width_px: u32,
    pub paper_height_px: u32,
    pub overlap_px: u32,
    pub stride_x_px: u32,
    pub stride_y_px: u32,
    pub grid_width_px: u32,
    pub grid_height_px: u32,
}

impl RasterGrid {
    pub fn new(grid: &GridGeometry, dpi: u32) -> Result<Self> {
        let paper_width_px = units::cm_to_px_len(grid.paper_width_cm, dpi)?;
        let paper_height_px = units::cm_to_px_len(grid.paper_height_cm, dpi)?;
        let overlap_px = units::cm_to_px_len(grid.overlap_cm, dpi)?;

        if overlap_px >= paper_width_px || overlap_px >= paper_height_px {
            return Err(TilewerkError::geometry(format!(
                "overlap of {overlap_px} px leaves no stride on a {paper_width_px}x{paper_height_px} px sheet at {dpi} dpi"
            )));
        }

        let stride_x_px = paper_width_px - overlap_px;
        let stride_y_px = paper_height_px - overlap_px;
        let grid_width_px = grid_span(grid.cols, stride_x_px, paper_width_px, dpi)?;
        let grid_height_px = grid_span(grid.rows, stride_y_px, paper_height_px, dpi)?;

        Ok(Self {
            dpi,
            cols: grid.cols,
            rows: grid.rows,
            paper_width_px,
            paper_height_px,
            overlap_px,
            stride_x_px,
            stride_y_px,
            grid_width_px,
            grid_height_px,
        })
    }

    pub fn bounds(&self) -> PxRect {
        PxRect::new(0, 0, self.grid_width_px, self.grid_height_px)
    }

    pub fn sheet_rect(&self, position: SheetPosition) -> PxRect {
        PxRect::new(
            position.col as i64 * self.stride_x_px as i64,
            position.row as i64 * self.stride_y_px as i64,
            self.paper_width_px,
            self.paper_height_px,
        )
    }

    /// Global cm position to global raster pixels.
    pub fn to_raster(&self, cm: f64) -> Result<i64> {
        units::cm_to_px(cm, self.dpi)
    }
}

/// `(count - 1) * stride + paper`, rejected when it leaves the pixel range.
fn grid_span(count: u32, stride_px: u32, paper_px: u32, dpi: u32) -> Result<u32> {
    count
        .saturating_sub(1)
        .checked_mul(stride_px)
        .and_then(|span| span.checked_add(paper_px))
        .ok_or_else(|| {
            TilewerkError::validation(format!(
                "{count} sheets of {paper_px} px at {dpi} dpi exceed the pixel range"
            ))
        })
}
