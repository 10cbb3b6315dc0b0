// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page encoding — PNG and JPEG output tagged with the export DPI, plus a
// content digest of the raw pixels.

use image::RgbImage;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tilewerk_core::error::{Result, TilewerkError};
use tilewerk_core::units::CM_PER_INCH;

/// File format for encoded pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    Png,
    Jpeg,
}

impl PageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Encode as PNG with a `pHYs` chunk recording `dpi`.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let per_metre = pixels_per_metre(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: per_metre,
            yppu: per_metre,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder
            .write_header()
            .map_err(|err| TilewerkError::ImageError(format!("PNG header failed: {}", err)))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|err| TilewerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
        writer
            .finish()
            .map_err(|err| TilewerkError::ImageError(format!("PNG encoding failed: {}", err)))?;
    }
    Ok(buffer)
}

/// Encode as JPEG at `quality` (1-100) with the JFIF density set to `dpi`.
pub fn encode_jpeg(image: &RgbImage, dpi: u32, quality: u8) -> Result<Vec<u8>> {
    let density = u16::try_from(dpi).map_err(|_| {
        TilewerkError::validation(format!("dpi {dpi} cannot be stored in a JPEG header"))
    })?;
    let mut buffer = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
        encoder.set_pixel_density(PixelDensity::dpi(density));
        encoder
            .encode_image(image)
            .map_err(|err| TilewerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
    }
    Ok(buffer)
}

/// Encode in `format`.
pub fn encode(image: &RgbImage, format: PageFormat, dpi: u32, jpeg_quality: u8) -> Result<Vec<u8>> {
    match format {
        PageFormat::Png => encode_png(image, dpi),
        PageFormat::Jpeg => encode_jpeg(image, dpi, jpeg_quality),
    }
}

/// SHA-256 of the raw RGB samples, lowercase hex.
pub fn pixel_digest(image: &RgbImage) -> String {
    hex::encode(Sha256::digest(image.as_raw()))
}

fn pixels_per_metre(dpi: u32) -> u32 {
    (dpi as f64 * 100.0 / CM_PER_INCH).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(8, 6, |x, y| Rgb([x as u8 * 30, y as u8 * 40, 128]))
    }

    #[test]
    fn png_carries_physical_dimensions() {
        let bytes = encode_png(&sample(), 300).unwrap();
        let decoder = png::Decoder::new(std::io::Cursor::new(bytes.as_slice()));
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
        assert_eq!(reader.info().width, 8);
    }

    #[test]
    fn png_round_trips_pixels() {
        let img = sample();
        let bytes = encode_png(&img, 150).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn jpeg_is_decodable() {
        let bytes = encode_jpeg(&sample(), 300, 90).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
        // JFIF APP0 density: units = 1 (dots per inch), then 300 big-endian.
        let app0 = bytes.windows(5).position(|w| w == b"JFIF\0").unwrap();
        assert_eq!(bytes[app0 + 7], 1);
        assert_eq!(u16::from_be_bytes([bytes[app0 + 8], bytes[app0 + 9]]), 300);
    }

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        let a = sample();
        let mut b = sample();
        assert_eq!(pixel_digest(&a), pixel_digest(&b));
        b.put_pixel(0, 0, Rgb([1, 2, 3]));
        assert_ne!(pixel_digest(&a), pixel_digest(&b));
        assert_eq!(pixel_digest(&a).len(), 64);
    }
}
