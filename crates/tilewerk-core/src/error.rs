// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tilewerk.

use thiserror::Error;

/// Top-level error type for all Tilewerk operations.
#[derive(Debug, Error)]
pub enum TilewerkError {
    // -- Request errors --
    /// Rejected input. The message is shown to the caller as-is.
    #[error("{0}")]
    Validation(String),

    // -- Image errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Internal --
    /// A layout invariant did not hold. Always a bug, never clamped away.
    #[error("geometry invariant violated: {0}")]
    GeometryInconsistency(String),

    /// The render was replaced by a newer export request before it finished.
    #[error("render superseded by a newer export request")]
    Superseded,

    // -- Storage --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TilewerkError {
    /// Shorthand for building a [`TilewerkError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a [`TilewerkError::GeometryInconsistency`] and log it at error
    /// level on the way out.
    pub fn geometry(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(%message, "geometry invariant violated");
        Self::GeometryInconsistency(message)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TilewerkError>;
