// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tilewerk-layout — Pure geometry for multi-sheet poster prints.
//
// One implementation of the grid, cover-fit, and coordinate formulas, used by
// both the interactive preview and the raster renderer. Nothing in this crate
// touches pixels; a full layout recompute is a handful of float operations and
// is safe to run on every pointer move.

pub mod coords;
pub mod cover;
pub mod grid;
pub mod plan;
pub mod preview;

pub use coords::{CoordinateTransformer, PreviewViewport, RasterGrid};
pub use cover::{CoverFitCalculator, FitAxis};
pub use grid::GridLayoutCalculator;
pub use plan::{LayoutPlan, PanRange, RasterLayout, RasterSheet};
pub use preview::{DragSession, InteractivePreview, PreviewFrame, PreviewPage};
