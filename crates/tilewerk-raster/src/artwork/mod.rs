// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Artwork module — crop/rotate/flip pipeline and kernel selection for
// resampling.

pub mod pipeline;
pub mod resample;

pub use pipeline::ImageTransformPipeline;
pub use resample::ResamplingEngine;
