// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the per-frame preview recompute. A drag frame
// must stay well under 16 ms; this measures the full plan + frame path that
// runs on every pointer move.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tilewerk_core::types::{Orientation, PaperSize, PlacementOffset};
use tilewerk_layout::{DragSession, GridLayoutCalculator, InteractivePreview, LayoutPlan};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Rebuild the plan and preview frame for an 8-sheet layout, as a drag
/// handler would on each pointer move.
fn bench_drag_frame(c: &mut Criterion) {
    let config = GridLayoutCalculator::job_config(PaperSize::A4, Orientation::Landscape, 8, 0.5)
        .expect("valid layout");
    let preview = InteractivePreview::new(1920.0, 1080.0, 0.9, 37.795);
    let plan = LayoutPlan::new(&config, 6000, 4000, PlacementOffset::default())
        .expect("valid plan");
    let viewport = preview.viewport(&plan).expect("valid viewport");
    let drag = DragSession::begin(viewport, 500.0, 500.0, plan.offset()).clamped_to(plan.pan_range());

    c.bench_function("drag frame (8 sheets)", |b| {
        let mut x = 500.0;
        b.iter(|| {
            x -= 1.0;
            let offset = drag.update(black_box(x), 500.0);
            let moved = LayoutPlan::new(&config, 6000, 4000, offset).expect("valid plan");
            black_box(preview.frame(&moved).expect("valid frame"));
        });
    });
}

/// Quantise the plan to 300 dpi output pixels.
fn bench_raster_plan(c: &mut Criterion) {
    let config = GridLayoutCalculator::job_config(PaperSize::A3, Orientation::Portrait, 6, 1.0)
        .expect("valid layout");
    let plan = LayoutPlan::new(&config, 5000, 5000, PlacementOffset::default())
        .expect("valid plan");

    c.bench_function("raster plan (6 sheets, 300 dpi)", |b| {
        b.iter(|| black_box(plan.raster(black_box(300)).expect("valid raster")));
    });
}

criterion_group!(benches, bench_drag_frame, bench_raster_plan);
criterion_main!(benches);
