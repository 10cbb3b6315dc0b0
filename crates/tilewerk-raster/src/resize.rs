// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standalone resize-for-print: scale an image to a physical size at a given
// DPI, reporting what changed.

use image::DynamicImage;
use serde::Serialize;
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::types::{ResampleAlgorithm, ResizeRequest};
use tilewerk_core::units;
use tracing::{info, instrument};

use crate::artwork::resample::ResamplingEngine;
use crate::source::SourceImage;

/// Result of [`resize_for_print`].
#[derive(Debug, Clone, Serialize)]
pub struct ResizeOutcome {
    #[serde(skip)]
    pub image: DynamicImage,
    pub original_width_px: u32,
    pub original_height_px: u32,
    pub original_width_cm: f64,
    pub original_height_cm: f64,
    pub final_width_px: u32,
    pub final_height_px: u32,
    pub final_width_cm: f64,
    pub final_height_cm: f64,
    pub dpi: u32,
    pub was_upscaled: bool,
    pub algorithm: ResampleAlgorithm,
}

/// Resize `source` so it prints at the requested size and DPI.
///
/// With one target dimension the other follows the source aspect ratio.
/// With both and `maintain_aspect`, the image fits inside the target box;
/// without `maintain_aspect` it is stretched to the box exactly.
///
/// Targets larger than `max_pixels` are rejected before anything is
/// allocated.
#[instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn resize_for_print(
    source: &SourceImage,
    request: &ResizeRequest,
    max_pixels: u64,
) -> Result<ResizeOutcome> {
    request.validate()?;
    let dpi = request.dpi;
    let (width, height) = (source.width(), source.height());
    let (final_width_px, final_height_px) = target_pixels(width, height, request, max_pixels)?;

    let pixels_in = source.pixel_count();
    let pixels_out = final_width_px as u64 * final_height_px as u64;
    let algorithm = ResamplingEngine::select(pixels_in, pixels_out);

    let image = if (final_width_px, final_height_px) == (width, height) {
        source.as_dynamic().clone()
    } else {
        source.as_dynamic().resize_exact(
            final_width_px,
            final_height_px,
            ResamplingEngine::filter(algorithm),
        )
    };

    // Without embedded metadata the source is assumed to be at the target dpi.
    let source_dpi = source.dpi().filter(|d| *d > 0).unwrap_or(dpi);
    let outcome = ResizeOutcome {
        image,
        original_width_px: width,
        original_height_px: height,
        original_width_cm: units::px_to_cm(width as f64, source_dpi)?,
        original_height_cm: units::px_to_cm(height as f64, source_dpi)?,
        final_width_px,
        final_height_px,
        final_width_cm: units::px_to_cm(final_width_px as f64, dpi)?,
        final_height_cm: units::px_to_cm(final_height_px as f64, dpi)?,
        dpi,
        was_upscaled: ResamplingEngine::is_upscale(pixels_in, pixels_out),
        algorithm,
    };
    info!(
        final_w = outcome.final_width_px,
        final_h = outcome.final_height_px,
        upscaled = outcome.was_upscaled,
        %algorithm,
        "Resized for print"
    );
    Ok(outcome)
}

fn target_pixels(
    width: u32,
    height: u32,
    request: &ResizeRequest,
    max_pixels: u64,
) -> Result<(u32, u32)> {
    let aspect = width as f64 / height as f64;
    let dpi = request.dpi;
    let from_width = |w: u32| (w, ((w as f64 / aspect).round() as u32).max(1));
    let from_height = |h: u32| (((h as f64 * aspect).round() as u32).max(1), h);

    let dims = match (request.target_width_cm, request.target_height_cm) {
        (Some(w_cm), None) => from_width(units::cm_to_px_len(w_cm, dpi)?.max(1)),
        (None, Some(h_cm)) => from_height(units::cm_to_px_len(h_cm, dpi)?.max(1)),
        (Some(w_cm), Some(h_cm)) => {
            let w = units::cm_to_px_len(w_cm, dpi)?.max(1);
            let h = units::cm_to_px_len(h_cm, dpi)?.max(1);
            if !request.maintain_aspect {
                (w, h)
            } else if w as f64 / h as f64 > aspect {
                // Box is wider than the image: height limits.
                from_height(h)
            } else {
                from_width(w)
            }
        }
        // Rejected by validate().
        (None, None) => (width, height),
    };

    let pixels = dims.0 as u64 * dims.1 as u64;
    if pixels > max_pixels {
        return Err(TilewerkError::validation(format!(
            "resizing to {}x{} px exceeds the limit of {max_pixels} pixels; lower the dpi or the target size",
            dims.0, dims.1
        )));
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tilewerk_core::config::TilerConfig;

    fn limit() -> u64 {
        TilerConfig::default().max_render_pixels
    }

    fn source(width: u32, height: u32) -> SourceImage {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        SourceImage::from_dynamic(DynamicImage::ImageRgb8(img), None).unwrap()
    }

    fn request(width: Option<f64>, height: Option<f64>, dpi: u32) -> ResizeRequest {
        ResizeRequest {
            target_width_cm: width,
            target_height_cm: height,
            dpi,
            maintain_aspect: true,
        }
    }

    #[test]
    fn width_only_keeps_aspect() {
        let outcome =
            resize_for_print(&source(2000, 1000), &request(Some(10.0), None, 300), limit())
                .unwrap();
        assert_eq!((outcome.final_width_px, outcome.final_height_px), (1181, 591));
        assert_eq!(outcome.image.width(), 1181);
        assert_eq!(outcome.image.height(), 591);
        assert!(!outcome.was_upscaled);
        assert_eq!(outcome.algorithm, ResampleAlgorithm::Lanczos3);
        assert_eq!(outcome.final_width_cm, 10.0);
        assert_eq!(outcome.original_width_cm, 16.93);
    }

    #[test]
    fn height_only_upscales_with_catmull_rom() {
        let outcome =
            resize_for_print(&source(100, 50), &request(None, Some(2.54), 100), limit()).unwrap();
        assert_eq!((outcome.final_width_px, outcome.final_height_px), (200, 100));
        assert!(outcome.was_upscaled);
        assert_eq!(outcome.algorithm, ResampleAlgorithm::CatmullRom);
    }

    #[test]
    fn both_dimensions_fit_inside() {
        // 2:1 image into a square box: width limits.
        let outcome =
            resize_for_print(&source(200, 100), &request(Some(2.54), Some(2.54), 100), limit())
                .unwrap();
        assert_eq!((outcome.final_width_px, outcome.final_height_px), (100, 50));

        // 1:2 image into a wide box: height limits.
        let outcome =
            resize_for_print(&source(100, 200), &request(Some(5.08), Some(2.54), 100), limit())
                .unwrap();
        assert_eq!((outcome.final_width_px, outcome.final_height_px), (50, 100));
    }

    #[test]
    fn both_dimensions_stretch_without_aspect() {
        let mut req = request(Some(2.54), Some(5.08), 100);
        req.maintain_aspect = false;
        let outcome = resize_for_print(&source(300, 300), &req, limit()).unwrap();
        assert_eq!((outcome.final_width_px, outcome.final_height_px), (100, 200));
    }

    #[test]
    fn original_size_uses_embedded_dpi() {
        let src = source(600, 300).with_dpi(150);
        let outcome = resize_for_print(&src, &request(Some(2.54), None, 300), limit()).unwrap();
        assert_eq!(outcome.original_width_cm, 10.16);
        assert_eq!(outcome.original_height_cm, 5.08);
        // Output is tagged with the requested dpi, not the source's.
        assert_eq!(outcome.dpi, 300);
        assert_eq!(outcome.final_width_px, 300);
    }

    #[test]
    fn rejects_missing_dimensions_and_bad_dpi() {
        let err =
            resize_for_print(&source(10, 10), &request(None, None, 300), limit()).unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
        assert!(err.to_string().contains("target width or target height"));

        let err = resize_for_print(&source(10, 10), &request(Some(5.0), None, 700), limit())
            .unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
        assert!(err.to_string().contains("between 72 and 600"));
    }

    #[test]
    fn oversized_target_is_rejected_before_allocating() {
        // 1000 cm at 600 dpi: 236220 x 118110 px.
        let err = resize_for_print(&source(20, 10), &request(Some(1_000.0), None, 600), limit())
            .unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
        assert!(err.to_string().contains("exceeds the limit"));

        // Too wide to count in u32 at all.
        let err = resize_for_print(&source(20, 10), &request(Some(100_000.0), None, 600), limit())
            .unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
    }

    #[test]
    fn limit_is_inclusive() {
        // 2.54 cm at 100 dpi on a square source: exactly 100 x 100 px.
        let req = request(Some(2.54), None, 100);
        assert!(resize_for_print(&source(10, 10), &req, 10_000).is_ok());
        let err = resize_for_print(&source(10, 10), &req, 9_999).unwrap_err();
        assert!(matches!(err, TilewerkError::Validation(_)));
    }
}
