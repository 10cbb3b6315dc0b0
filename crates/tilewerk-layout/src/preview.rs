// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive preview — canvas-space geometry for drag-to-position UIs.
//
// A frame is recomputed from the shared `LayoutPlan` on every pointer move.
// Pages are drawn from the same sheet rectangles the renderer uses, only
// pushed through the viewport mapping, so what the user aligns is what
// prints.

use serde::{Deserialize, Serialize};
use tilewerk_core::config::TilerConfig;
use tilewerk_core::error::Result;
use tilewerk_core::types::{PlacementOffset, RectCm, SheetPosition};
use tracing::trace;

use crate::coords::{CanvasRect, PreviewViewport};
use crate::plan::{LayoutPlan, PanRange};

/// Preview surface of a fixed canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractivePreview {
    canvas_width_px: f64,
    canvas_height_px: f64,
    margin: f64,
    px_per_cm: f64,
}

impl InteractivePreview {
    pub fn new(canvas_width_px: f64, canvas_height_px: f64, margin: f64, px_per_cm: f64) -> Self {
        Self {
            canvas_width_px,
            canvas_height_px,
            margin,
            px_per_cm,
        }
    }

    /// Preview using the margin and screen density from `config`.
    pub fn from_config(config: &TilerConfig, canvas_width_px: f64, canvas_height_px: f64) -> Self {
        Self::new(
            canvas_width_px,
            canvas_height_px,
            config.preview_margin,
            config.preview_px_per_cm,
        )
    }

    /// Canvas resized (window resize). Returns a new preview.
    pub fn resized(&self, canvas_width_px: f64, canvas_height_px: f64) -> Self {
        Self {
            canvas_width_px,
            canvas_height_px,
            ..*self
        }
    }

    pub fn viewport(&self, plan: &LayoutPlan) -> Result<PreviewViewport> {
        PreviewViewport::fit(
            self.canvas_width_px,
            self.canvas_height_px,
            self.margin,
            self.px_per_cm,
            plan.grid(),
        )
    }

    /// Everything needed to draw one preview frame.
    pub fn frame(&self, plan: &LayoutPlan) -> Result<PreviewFrame> {
        let viewport = self.viewport(plan)?;
        let coords = plan.transformer();

        let pages = plan
            .sheet_rects()
            .into_iter()
            .map(|(position, rect)| PreviewPage {
                position,
                page_number: position.page_number(plan.config().cols),
                label: position.label(),
                rect: viewport.to_canvas_rect(&rect),
            })
            .collect();

        trace!(scale = viewport.scale, "Preview frame computed");

        Ok(PreviewFrame {
            viewport,
            grid: viewport.to_canvas_rect(&plan.grid().bounds()),
            artwork: viewport.to_canvas_rect(&coords.artwork_rect()),
            pages,
        })
    }
}

/// Canvas-space geometry of one preview frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewFrame {
    pub viewport: PreviewViewport,
    pub grid: CanvasRect,
    pub artwork: CanvasRect,
    /// Row-major, drawn in order, so later pages sit on top.
    pub pages: Vec<PreviewPage>,
}

impl PreviewFrame {
    /// Topmost page under a canvas point.
    pub fn page_at(&self, x_px: f64, y_px: f64) -> Option<&PreviewPage> {
        self.pages.iter().rev().find(|page| page.rect.contains(x_px, y_px))
    }

    /// Page rectangles with the viewport mapping removed, i.e. back in global
    /// cm. Must equal the renderer's sheet rectangles.
    pub fn global_page_rects(&self) -> Vec<(SheetPosition, RectCm)> {
        self.pages
            .iter()
            .map(|page| (page.position, self.viewport.from_canvas_rect(&page.rect)))
            .collect()
    }
}

/// A sheet outline on the preview canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewPage {
    pub position: SheetPosition,
    pub page_number: u32,
    pub label: String,
    pub rect: CanvasRect,
}

/// A pointer drag that moves the artwork.
///
/// Holds the offset and pointer position at drag start; every update maps
/// the total pointer delta through the viewport, so rounding never
/// accumulates across moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    viewport: PreviewViewport,
    start_pointer: (f64, f64),
    start_offset: PlacementOffset,
    bounds: Option<PanRange>,
}

impl DragSession {
    pub fn begin(
        viewport: PreviewViewport,
        pointer_x_px: f64,
        pointer_y_px: f64,
        start_offset: PlacementOffset,
    ) -> Self {
        Self {
            viewport,
            start_pointer: (pointer_x_px, pointer_y_px),
            start_offset,
            bounds: None,
        }
    }

    /// Keep the artwork inside `range` while dragging.
    pub fn clamped_to(mut self, range: PanRange) -> Self {
        self.bounds = Some(range);
        self
    }

    /// Offset for the pointer's current position.
    pub fn update(&self, pointer_x_px: f64, pointer_y_px: f64) -> PlacementOffset {
        let (dx, dy) = self.viewport.delta_to_cm(
            pointer_x_px - self.start_pointer.0,
            pointer_y_px - self.start_pointer.1,
        );
        let offset = PlacementOffset::new(
            self.start_offset.offset_x_cm + dx,
            self.start_offset.offset_y_cm + dy,
        );
        match self.bounds {
            Some(range) => range.clamp(offset),
            None => offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayoutCalculator;
    use tilewerk_core::types::{Orientation, PaperSize, SUPPORTED_SHEET_COUNTS};

    fn plan(sheets: u32, orientation: Orientation, offset: PlacementOffset) -> LayoutPlan {
        let config =
            GridLayoutCalculator::job_config(PaperSize::A4, orientation, sheets, 0.5).unwrap();
        LayoutPlan::new(&config, 1600, 900, offset).unwrap()
    }

    #[test]
    fn preview_pages_map_back_to_backend_rects() {
        let preview = InteractivePreview::new(1280.0, 720.0, 0.9, 37.795);
        for sheets in SUPPORTED_SHEET_COUNTS {
            for orientation in [Orientation::Portrait, Orientation::Landscape] {
                let plan = plan(sheets, orientation, PlacementOffset::new(-3.25, 1.5));
                let frame = preview.frame(&plan).unwrap();
                let backend = plan.sheet_rects();
                let round_trip = frame.global_page_rects();
                assert_eq!(backend.len(), round_trip.len());
                for ((pos_a, a), (pos_b, b)) in backend.iter().zip(round_trip.iter()) {
                    assert_eq!(pos_a, pos_b);
                    assert!(a.approx_eq(b, 1e-9), "{a:?} vs {b:?}");
                }
            }
        }
    }

    #[test]
    fn grid_is_centred_within_margin() {
        let preview = InteractivePreview::new(1000.0, 1000.0, 0.8, 37.795);
        let frame = preview.frame(&plan(4, Orientation::Portrait, Default::default())).unwrap();
        assert!(frame.grid.width <= 800.0 + 1e-9);
        assert!(frame.grid.height <= 800.0 + 1e-9);
        let left = frame.grid.x;
        let right = 1000.0 - (frame.grid.x + frame.grid.width);
        assert!((left - right).abs() < 1e-9);
    }

    #[test]
    fn page_at_prefers_topmost_in_overlap() {
        let preview = InteractivePreview::new(1000.0, 1000.0, 0.9, 37.795);
        let frame = preview.frame(&plan(2, Orientation::Portrait, Default::default())).unwrap();
        let second = &frame.pages[1];
        // Just inside the left edge of page 2 is inside the overlap strip.
        let hit = frame.page_at(second.rect.x + 0.5, second.rect.y + 10.0).unwrap();
        assert_eq!(hit.label, "2,1");
        let first = &frame.pages[0];
        let hit = frame.page_at(first.rect.x + 1.0, first.rect.y + 1.0).unwrap();
        assert_eq!(hit.label, "1,1");
        assert!(frame.page_at(-1.0, -1.0).is_none());
    }

    #[test]
    fn drag_moves_by_canvas_delta() {
        let preview = InteractivePreview::new(800.0, 600.0, 0.9, 37.795);
        let plan = plan(4, Orientation::Portrait, Default::default());
        let viewport = preview.viewport(&plan).unwrap();
        let drag = DragSession::begin(viewport, 100.0, 100.0, plan.offset());

        let moved = drag.update(100.0 - viewport.zoom() * 2.0, 100.0);
        assert!((moved.offset_x_cm + 2.0).abs() < 1e-9);
        assert!(moved.offset_y_cm.abs() < 1e-9);

        // The same pointer position always gives the same offset.
        assert_eq!(drag.update(42.0, 17.0), drag.update(42.0, 17.0));
    }

    #[test]
    fn clamped_drag_keeps_cover() {
        let preview = InteractivePreview::new(800.0, 600.0, 0.9, 37.795);
        let plan = plan(1, Orientation::Portrait, Default::default());
        let viewport = preview.viewport(&plan).unwrap();
        let drag = DragSession::begin(viewport, 0.0, 0.0, plan.offset()).clamped_to(plan.pan_range());
        let offset = drag.update(10_000.0, -10_000.0);
        assert!(plan.pan_range().contains(offset));
    }

    #[test]
    fn resized_preview_changes_scale_only() {
        let preview = InteractivePreview::new(800.0, 600.0, 0.9, 37.795);
        let plan = plan(6, Orientation::Portrait, Default::default());
        let small = preview.viewport(&plan).unwrap();
        let large = preview.resized(1600.0, 1200.0).viewport(&plan).unwrap();
        assert!(large.scale > small.scale);
        assert_eq!(large.px_per_cm, small.px_per_cm);
    }
}
