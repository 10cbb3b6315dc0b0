// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artwork transform pipeline — crop, rotate, flip, in that order. Output is
// always opaque RGB: transparency and any corners uncovered by rotation are
// filled with white so nothing prints as undefined.

use image::{DynamicImage, Rgb, RgbImage, RgbaImage, imageops};
use imageproc::geometric_transformations::{self, Interpolation};
use tilewerk_core::error::Result;
use tilewerk_core::types::{ArtworkTransform, quarter_turns, rotated_bounds};
use tracing::{debug, info, instrument};

use crate::source::SourceImage;

/// Paper white.
pub const PAPER_WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Applies an [`ArtworkTransform`] to source artwork.
///
/// The order is fixed and the steps do not commute:
///
/// 1. crop in source-pixel space
/// 2. rotate clockwise about the crop centre, growing the canvas to the
///    rotated bounding box
/// 3. flip horizontally and/or vertically
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageTransformPipeline {
    transform: ArtworkTransform,
}

impl ImageTransformPipeline {
    pub fn new(transform: ArtworkTransform) -> Self {
        Self { transform }
    }

    pub fn transform(&self) -> &ArtworkTransform {
        &self.transform
    }

    /// Pixel size of the result without running the pipeline. The preview
    /// uses this to plan a layout before any pixels are touched.
    pub fn output_dimensions(&self, source: &SourceImage) -> Result<(u32, u32)> {
        self.transform.validate(source.width(), source.height())?;
        Ok(self
            .transform
            .output_dimensions(source.width(), source.height()))
    }

    /// Run the pipeline. The crop is validated against the source first.
    #[instrument(skip_all, fields(width = source.width(), height = source.height()))]
    pub fn apply(&self, source: &SourceImage) -> Result<RgbImage> {
        self.transform.validate(source.width(), source.height())?;

        let cropped = crop(source.as_dynamic(), &self.transform);
        let opaque = flatten_onto_white(&cropped);
        let rotated = rotate(opaque, self.transform.rotation_degrees);
        let flipped = flip(rotated, &self.transform);

        info!(
            out_w = flipped.width(),
            out_h = flipped.height(),
            rotation = self.transform.rotation_degrees,
            "Artwork transformed"
        );
        Ok(flipped)
    }
}

fn crop(image: &DynamicImage, transform: &ArtworkTransform) -> RgbaImage {
    match transform.crop {
        Some(rect) => {
            debug!(x = rect.x, y = rect.y, w = rect.width, h = rect.height, "Cropping");
            imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image()
        }
        None => image.to_rgba8(),
    }
}

/// Composite over white paper.
fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let blend = |channel: u8| -> u8 {
            let a = a as u32;
            ((channel as u32 * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn rotate(image: RgbImage, degrees: f64) -> RgbImage {
    match quarter_turns(degrees) {
        Some(0) => image,
        Some(1) => imageops::rotate90(&image),
        Some(2) => imageops::rotate180(&image),
        Some(_) => imageops::rotate270(&image),
        None => rotate_expanded(&image, degrees),
    }
}

/// Arbitrary-angle rotation onto a canvas large enough to hold every corner.
fn rotate_expanded(image: &RgbImage, degrees: f64) -> RgbImage {
    let (width, height) = image.dimensions();
    let (bound_w, bound_h) = rotated_bounds(width, height, degrees);

    // Centre the artwork on a white canvas of the final size, then rotate
    // about the canvas centre.
    let mut canvas = RgbImage::from_pixel(bound_w, bound_h, PAPER_WHITE);
    imageops::replace(
        &mut canvas,
        image,
        (bound_w as i64 - width as i64) / 2,
        (bound_h as i64 - height as i64) / 2,
    );

    debug!(bound_w, bound_h, degrees, "General rotation applied");
    geometric_transformations::rotate_about_center(
        &canvas,
        degrees.to_radians() as f32,
        Interpolation::Bicubic,
        PAPER_WHITE,
    )
}

fn flip(image: RgbImage, transform: &ArtworkTransform) -> RgbImage {
    let image = if transform.flip_horizontal {
        imageops::flip_horizontal(&image)
    } else {
        image
    };
    if transform.flip_vertical {
        imageops::flip_vertical(&image)
    } else {
        image
    }
}
