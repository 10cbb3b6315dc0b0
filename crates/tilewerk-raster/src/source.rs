// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source artwork as supplied by the host: decoded pixels plus optional DPI
// metadata.

use image::DynamicImage;
use tilewerk_core::error::{Result, TilewerkError};
use tracing::{debug, info, instrument};

/// A decoded artwork with known, non-zero dimensions.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    /// DPI recorded in the source file, if the host knows it.
    dpi: Option<u32>,
}

impl SourceImage {
    // -- Construction ---------------------------------------------------------

    /// Decode an image from raw encoded bytes (JPEG, PNG, WebP, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| TilewerkError::Decode(err.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Artwork decoded from bytes"
        );
        Self::from_dynamic(image, None)
    }

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|err| {
            TilewerkError::Decode(format!("{}: {}", path.as_ref().display(), err))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            "Artwork loaded"
        );
        Self::from_dynamic(image, None)
    }

    /// Wrap an already-decoded image. Zero-sized images are rejected as
    /// undecodable.
    pub fn from_dynamic(image: DynamicImage, dpi: Option<u32>) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(TilewerkError::Decode(format!(
                "image has no usable dimensions ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image, dpi })
    }

    /// Attach DPI metadata read by the host.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dpi(&self) -> Option<u32> {
        self.dpi
    }

    pub fn pixel_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }
}
