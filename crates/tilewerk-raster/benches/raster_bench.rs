// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the raster side: the transform pipeline and a
// full multi-sheet tile render at low DPI.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use tilewerk_core::{ArtworkTransform, Orientation, PaperSize, PlacementOffset};
use tilewerk_layout::GridLayoutCalculator;
use tilewerk_raster::{ImageTransformPipeline, SourceImage, TileRasterizer};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Synthetic 400x300 gradient, enough structure to keep the kernels honest.
fn artwork() -> SourceImage {
    let img = RgbImage::from_fn(400, 300, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    SourceImage::from_dynamic(DynamicImage::ImageRgb8(img), None)
        .expect("synthetic artwork is non-empty")
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Free-angle rotation plus flip, the most expensive transform path.
fn bench_transform_pipeline(c: &mut Criterion) {
    let source = artwork();
    let pipeline = ImageTransformPipeline::new(ArtworkTransform {
        rotation_degrees: 17.0,
        flip_horizontal: true,
        ..Default::default()
    });

    c.bench_function("transform_pipeline (400x300, 17deg)", |b| {
        b.iter(|| black_box(pipeline.apply(black_box(&source))));
    });
}

/// Four A5 sheets at 72 dpi with the artwork panned left.
fn bench_tile_render(c: &mut Criterion) {
    let source = artwork();
    let config = GridLayoutCalculator::job_config(PaperSize::A5, Orientation::Portrait, 4, 0.5)
        .expect("4 sheets is a supported count");
    let rasterizer = TileRasterizer::default();
    let offset = PlacementOffset::new(-2.0, 0.0);

    c.bench_function("tile_render (4 x A5 @ 72dpi)", |b| {
        b.iter(|| {
            let pages = rasterizer.render(
                black_box(&source),
                &config,
                &ArtworkTransform::default(),
                offset,
                72,
            );
            black_box(pages)
        });
    });
}

criterion_group!(benches, bench_transform_pipeline, bench_tile_render);
criterion_main!(benches);
