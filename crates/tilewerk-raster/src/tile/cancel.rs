// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Generation-based cancellation. Each export takes a token stamped with the
// generation current at submission; any later submission bumps the shared
// counter and the older token reads as cancelled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tilewerk_core::error::{Result, TilewerkError};

#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CancelToken {
    /// Token that belongs to `latest` at its next generation. Bumping the
    /// counter is what supersedes every older token.
    pub(crate) fn issue(latest: &Arc<AtomicU64>) -> Self {
        let generation = latest.fetch_add(1, Ordering::AcqRel) + 1;
        Self {
            generation,
            latest: Arc::clone(latest),
        }
    }

    /// A token nothing can supersede.
    pub fn never() -> Self {
        Self {
            generation: 0,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.generation
    }

    /// `Err(Superseded)` once a newer request exists.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(TilewerkError::Superseded)
        } else {
            Ok(())
        }
    }
}
